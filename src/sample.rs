use crate::error::RecorderError;
use serde::{Deserialize, Serialize};

/// One recorded coordinate pair, kept as the text the coordinate display showed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub lon: String,
    pub lat: String,
}

/// Samples in the order they were recorded.
pub type CoordinateLog = Vec<Sample>;

impl Sample {
    pub fn new(lon: impl Into<String>, lat: impl Into<String>) -> Self {
        Self {
            lon: lon.into(),
            lat: lat.into(),
        }
    }

    /// Parse coordinate display text of the form `"lon, lat"`.
    ///
    /// Splits on the first comma and trims both halves. Text without a comma,
    /// or with an empty half, is rejected.
    pub fn parse_display_text(text: &str) -> Result<Self, RecorderError> {
        let malformed = || RecorderError::MalformedSample(text.to_string());

        let (lon, lat) = text.trim().split_once(',').ok_or_else(malformed)?;
        let (lon, lat) = (lon.trim(), lat.trim());
        if lon.is_empty() || lat.is_empty() {
            return Err(malformed());
        }

        Ok(Self::new(lon, lat))
    }
}

/// Structured pointer position reported by the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub lon: f64,
    pub lat: f64,
}

impl PointerPosition {
    /// Format as a sample. `None` keeps the shortest round-trip representation.
    pub fn to_sample(self, precision: Option<usize>) -> Result<Sample, RecorderError> {
        if !self.lon.is_finite() || !self.lat.is_finite() {
            return Err(RecorderError::MalformedSample(format!(
                "{}, {}",
                self.lon, self.lat
            )));
        }

        Ok(match precision {
            Some(p) => Sample::new(format!("{:.*}", p, self.lon), format!("{:.*}", p, self.lat)),
            None => Sample::new(self.lon.to_string(), self.lat.to_string()),
        })
    }
}

/// A sample parsed into numbers, ready to move a feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub lon: f64,
    pub lat: f64,
}

impl TryFrom<&Sample> for Waypoint {
    type Error = RecorderError;

    fn try_from(sample: &Sample) -> Result<Self, Self::Error> {
        let parse = |field: &str| {
            field
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    RecorderError::InvalidCoordinate(format!("{}, {}", sample.lon, sample.lat))
                })
        };

        Ok(Self {
            lon: parse(&sample.lon)?,
            lat: parse(&sample.lat)?,
        })
    }
}
