use crate::display::StatusDisplay;
use crate::error::RecorderError;
use crate::export::{FileSaver, to_pretty_json};
use crate::messages::RecordingState;
use crate::sample::{CoordinateLog, PointerPosition, Sample};
use anyhow::Result;
use std::path::PathBuf;

/// Captures pointer coordinates while recording is active
///
/// This service:
/// - Tracks the recording state (`Idle` / `Recording`)
/// - Appends a sample for each well-formed pointer move while recording
/// - Reports status and sample count to a display
/// - Exports the log as pretty-printed JSON through a file saver
///
/// It is owned by the app shell and only mutated from the event loop, so
/// it needs no locking.
pub struct Recorder<D: StatusDisplay> {
    state: RecordingState,
    log: CoordinateLog,
    display: D,
    precision: Option<usize>,
}

impl<D: StatusDisplay> Recorder<D> {
    pub fn new(display: D, precision: Option<usize>) -> Self {
        Self {
            state: RecordingState::Idle,
            log: CoordinateLog::new(),
            display,
            precision,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn log(&self) -> &[Sample] {
        &self.log
    }

    #[cfg(test)]
    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Record coordinate display text such as `"121.05, 14.65"`.
    ///
    /// Ignored while idle. Malformed text is dropped without touching the
    /// count; the error is returned only so callers can tell.
    pub fn handle_pointer_move(&mut self, text: &str) -> Result<(), RecorderError> {
        if self.state != RecordingState::Recording {
            return Ok(());
        }

        match Sample::parse_display_text(text) {
            Ok(sample) => {
                self.push(sample);
                Ok(())
            }
            Err(e) => {
                tracing::trace!("Dropping pointer text: {}", e);
                Err(e)
            }
        }
    }

    /// Record a structured pointer position.
    pub fn handle_pointer_position(&mut self, position: PointerPosition) -> Result<(), RecorderError> {
        if self.state != RecordingState::Recording {
            return Ok(());
        }

        match position.to_sample(self.precision) {
            Ok(sample) => {
                self.push(sample);
                Ok(())
            }
            Err(e) => {
                tracing::trace!("Dropping pointer position: {}", e);
                Err(e)
            }
        }
    }

    fn push(&mut self, sample: Sample) {
        tracing::debug!("Recorded sample lon={} lat={}", sample.lon, sample.lat);
        self.log.push(sample);
        self.display.show_count(self.log.len());
    }

    /// Clear the log and start recording. Calling it again starts over.
    pub fn start_recording(&mut self) {
        tracing::info!("Starting recording");
        self.log.clear();
        self.display.show_count(0);
        self.state = RecordingState::Recording;
        self.display.show_status(self.state);
    }

    pub fn stop_recording(&mut self) {
        tracing::info!("Stopping recording ({} samples)", self.log.len());
        self.state = RecordingState::Idle;
        self.display.show_status(self.state);
    }

    /// Serialize the log and hand it to `saver` as `<base_name>.json`.
    ///
    /// Fails with [`RecorderError::EmptyLog`] when nothing was recorded; in
    /// that case the saver is never called.
    pub async fn export_log(
        &self,
        base_name: &str,
        saver: &mut (dyn FileSaver + '_),
    ) -> Result<PathBuf> {
        if self.log.is_empty() {
            return Err(RecorderError::EmptyLog.into());
        }

        let contents = to_pretty_json(&self.log)?;
        let file_name = format!("{}.json", base_name);
        tracing::info!("Exporting {} samples as {}", self.log.len(), file_name);

        saver.save(contents, &file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryDisplay;
    use crate::export::saver::MemorySaver;

    fn recorder() -> Recorder<MemoryDisplay> {
        Recorder::new(MemoryDisplay::default(), None)
    }

    #[test]
    fn test_starts_idle_and_empty() {
        let recorder = recorder();
        assert_eq!(recorder.state(), RecordingState::Idle);
        assert!(recorder.log().is_empty());
    }

    #[test]
    fn test_no_growth_when_idle() {
        let mut recorder = recorder();
        for text in ["121.05, 14.65", "invalid", "1,2"] {
            assert!(recorder.handle_pointer_move(text).is_ok());
        }
        recorder
            .handle_pointer_position(PointerPosition { lon: 1.0, lat: 2.0 })
            .unwrap();

        assert!(recorder.log().is_empty());
        assert_eq!(recorder.display().count, None);
    }

    #[test]
    fn test_no_growth_after_stop() {
        let mut recorder = recorder();
        recorder.start_recording();
        recorder.handle_pointer_move("1, 2").unwrap();
        recorder.stop_recording();
        recorder.handle_pointer_move("3, 4").unwrap();

        assert_eq!(recorder.log(), &[Sample::new("1", "2")]);
    }

    #[test]
    fn test_well_formed_move_appends_one() {
        let mut recorder = recorder();
        recorder.start_recording();

        let inputs = [
            ("121.05, 14.65", "121.05", "14.65"),
            ("  -0.5,0.25 ", "-0.5", "0.25"),
            ("10 ,  20, 30", "10", "20, 30"),
        ];
        for (i, (text, lon, lat)) in inputs.iter().enumerate() {
            recorder.handle_pointer_move(text).unwrap();
            assert_eq!(recorder.log().len(), i + 1);
            assert_eq!(recorder.log().last(), Some(&Sample::new(*lon, *lat)));
            assert_eq!(recorder.display().count, Some(i + 1));
        }
    }

    #[test]
    fn test_malformed_move_is_dropped() {
        let mut recorder = recorder();
        recorder.start_recording();
        recorder.handle_pointer_move("1, 2").unwrap();

        let result = recorder.handle_pointer_move("invalid");
        assert!(matches!(result, Err(RecorderError::MalformedSample(_))));
        assert_eq!(recorder.log().len(), 1);
        assert_eq!(recorder.display().count, Some(1));
        assert_eq!(recorder.state(), RecordingState::Recording);
    }

    #[test]
    fn test_pointer_position_uses_precision() {
        let mut recorder = Recorder::new(MemoryDisplay::default(), Some(2));
        recorder.start_recording();
        recorder
            .handle_pointer_position(PointerPosition {
                lon: 121.0471,
                lat: 14.6501,
            })
            .unwrap();

        assert_eq!(recorder.log(), &[Sample::new("121.05", "14.65")]);
    }

    #[test]
    fn test_start_resets_log() {
        let mut recorder = recorder();
        recorder.start_recording();
        for text in ["1, 1", "2, 2", "3, 3"] {
            recorder.handle_pointer_move(text).unwrap();
        }
        assert_eq!(recorder.log().len(), 3);

        recorder.start_recording();
        assert!(recorder.log().is_empty());
        assert_eq!(recorder.state(), RecordingState::Recording);
        assert_eq!(recorder.display().count, Some(0));
        assert_eq!(recorder.display().status, Some("RECORDING"));

        recorder.handle_pointer_move("4, 4").unwrap();
        assert_eq!(recorder.log(), &[Sample::new("4", "4")]);
    }

    #[test]
    fn test_stop_when_idle_still_reports() {
        let mut recorder = recorder();
        recorder.stop_recording();
        recorder.stop_recording();

        assert_eq!(recorder.state(), RecordingState::Idle);
        assert_eq!(recorder.display().status, Some("NOT RECORDING"));
        assert_eq!(recorder.display().status_updates, 2);
    }

    #[tokio::test]
    async fn test_export_empty_log_fails() {
        let mut recorder = recorder();
        let mut saver = MemorySaver::default();

        let err = recorder.export_log("walk", &mut saver).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecorderError>(),
            Some(&RecorderError::EmptyLog)
        );
        assert!(saver.saved.is_empty());

        // Recording state is untouched by a failed export.
        recorder.start_recording();
        let err = recorder.export_log("walk", &mut saver).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<RecorderError>(),
            Some(&RecorderError::EmptyLog)
        );
        assert_eq!(recorder.state(), RecordingState::Recording);
        assert!(saver.saved.is_empty());
    }

    #[tokio::test]
    async fn test_walk_scenario() {
        let mut recorder = recorder();
        let mut saver = MemorySaver::default();

        recorder.start_recording();
        recorder.handle_pointer_move("121.05, 14.65").unwrap();
        assert!(recorder.handle_pointer_move("invalid").is_err());
        recorder.handle_pointer_move("121.06, 14.66").unwrap();
        recorder.stop_recording();

        let path = recorder.export_log("walk", &mut saver).await.unwrap();
        assert_eq!(path, PathBuf::from("walk.json"));

        let expected = vec![
            Sample::new("121.05", "14.65"),
            Sample::new("121.06", "14.66"),
        ];
        assert_eq!(recorder.log(), expected.as_slice());

        assert_eq!(saver.saved.len(), 1);
        let (name, bytes) = &saver.saved[0];
        assert_eq!(name, "walk.json");
        assert_eq!(bytes, &to_pretty_json(&expected).unwrap());
    }

    #[tokio::test]
    async fn test_export_round_trip_preserves_order() {
        let mut recorder = recorder();
        let mut saver = MemorySaver::default();

        recorder.start_recording();
        for i in 0..5 {
            recorder
                .handle_pointer_move(&format!("121.0{i}, 14.6{i}"))
                .unwrap();
        }
        recorder.export_log("loop", &mut saver).await.unwrap();

        // Export is available while still recording and does not mutate the log.
        assert_eq!(recorder.state(), RecordingState::Recording);
        assert_eq!(recorder.log().len(), 5);

        let parsed: Vec<Sample> = serde_json::from_slice(&saver.saved[0].1).unwrap();
        assert_eq!(parsed, recorder.log());
    }
}
