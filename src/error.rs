use thiserror::Error;

/// Failures the recorder recognizes.
///
/// `MalformedSample` never reaches the operator; it only tells the caller
/// that a pointer event was dropped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("No coordinates generated")]
    EmptyLog,

    #[error("malformed pointer text: {0:?}")]
    MalformedSample(String),

    #[error("invalid export file name: {0:?}")]
    InvalidFileName(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("no feature named {0:?}")]
    UnknownFeature(String),
}
