use crate::sample::PointerPosition;

/// Whether pointer moves are being captured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

impl RecordingState {
    /// Text shown in the status display
    pub fn status_text(self) -> &'static str {
        match self {
            RecordingState::Idle => "NOT RECORDING",
            RecordingState::Recording => "RECORDING",
        }
    }
}

/// Recorder commands selected by the keyboard protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    StartRecording,
    StopRecording,
    Export,
}

/// A key press as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key_code: u32,
    pub shift_key: bool,
}

/// Events read from the host's event stream
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Key(KeyPress),
    PointerText(String),
    PointerPosition(PointerPosition),
    FileName(String),
    Quit,
}
