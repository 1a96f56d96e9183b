use crate::config::Config;
use crate::display::{ConsoleDisplay, StatusDisplay};
use crate::error::RecorderError;
use crate::export::{DirectorySaver, FileSaver};
use crate::input;
use crate::messages::{Command, InputEvent};
use crate::services::Recorder;

use anyhow::Result;
use tokio::sync::mpsc;

enum Flow {
    Continue,
    Quit,
}

pub struct App<D: StatusDisplay> {
    recorder: Recorder<D>,
    saver: Box<dyn FileSaver>,
    file_name: String,
    input_rx: mpsc::Receiver<InputEvent>,
}

impl App<ConsoleDisplay> {
    pub fn new(config: &Config) -> Self {
        let display = ConsoleDisplay::new(config.echo_status);
        let recorder = Recorder::new(display, config.coordinate_precision);
        let saver = Box::new(DirectorySaver::new(config.export_dir.clone()));
        tracing::info!("Exports go to {:?}", saver.dir());
        let input_rx = Self::setup_input_monitoring();

        tracing::info!("Ready! Shift+Q start, Shift+W stop, Shift+S save");

        App::with_parts(recorder, saver, config.default_file_name.clone(), input_rx)
    }

    fn setup_input_monitoring() -> mpsc::Receiver<InputEvent> {
        let (input_tx, input_rx) = mpsc::channel(100);
        // Plain thread: the process exits without waiting on a parked stdin read.
        let spawned = std::thread::Builder::new()
            .name("input-monitor".to_string())
            .spawn(move || {
                if let Err(e) = input::monitor_input(std::io::stdin().lock(), input_tx) {
                    tracing::error!("Input monitor failed: {}", e);
                }
            });
        if let Err(e) = spawned {
            tracing::error!("Failed to start input monitor: {}", e);
        }
        input_rx
    }
}

impl<D: StatusDisplay> App<D> {
    pub fn with_parts(
        recorder: Recorder<D>,
        saver: Box<dyn FileSaver>,
        file_name: String,
        input_rx: mpsc::Receiver<InputEvent>,
    ) -> Self {
        Self {
            recorder,
            saver,
            file_name,
            input_rx,
        }
    }

    pub fn recorder(&self) -> &Recorder<D> {
        &self.recorder
    }

    /// Process events until `quit`, end of input or Ctrl+C.
    pub async fn run(self) -> Result<Self> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, shutting down");
        })
        .await
    }

    pub async fn run_until<F>(mut self, shutdown: F) -> Result<Self>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = self.input_rx.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Input closed, shutting down");
                        break;
                    };
                    match self.handle_event(event).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Quit) => break,
                        Err(e) => tracing::error!("Error handling event: {:#}", e),
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        Ok(self)
    }

    async fn handle_event(&mut self, event: InputEvent) -> Result<Flow> {
        match event {
            InputEvent::Key(key) => {
                if let Some(command) = input::command_for_key(key) {
                    self.handle_command(command).await?;
                }
            }
            InputEvent::PointerText(text) => {
                if let Err(e) = self.recorder.handle_pointer_move(&text) {
                    tracing::trace!("Pointer move dropped: {}", e);
                }
            }
            InputEvent::PointerPosition(position) => {
                if let Err(e) = self.recorder.handle_pointer_position(position) {
                    tracing::trace!("Pointer position dropped: {}", e);
                }
            }
            InputEvent::FileName(name) => {
                tracing::debug!("File name set to {:?}", name);
                self.file_name = name;
            }
            InputEvent::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn handle_command(&mut self, command: Command) -> Result<()> {
        tracing::debug!("handle_command: {:?} in {:?}", command, self.recorder.state());

        match command {
            Command::StartRecording => self.recorder.start_recording(),
            Command::StopRecording => self.recorder.stop_recording(),
            Command::Export => self.handle_export().await?,
        }

        Ok(())
    }

    async fn handle_export(&mut self) -> Result<()> {
        match self
            .recorder
            .export_log(&self.file_name, self.saver.as_mut())
            .await
        {
            Ok(path) => {
                tracing::info!("Export complete: {:?}", path);
                Ok(())
            }
            // Anything the operator can fix is shown to them; I/O failures are
            // shown too and then logged by the event loop.
            Err(e) if e.downcast_ref::<RecorderError>().is_some() => {
                self.recorder.display_mut().alert(&e.to_string());
                Ok(())
            }
            Err(e) => {
                self.recorder
                    .display_mut()
                    .alert(&format!("Export failed: {:#}", e));
                Err(e)
            }
        }
    }
}
