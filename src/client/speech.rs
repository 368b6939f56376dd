// src/client/speech.rs
//! Optional speech capabilities. Either side may be missing on a given host,
//! so every implementation reports `is_supported` and callers degrade to a no-op.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech capability is not supported")]
    Unsupported,

    #[error("speech capture is already running")]
    AlreadyActive,

    #[error("failed to launch speech command: {0}")]
    Launch(#[from] std::io::Error),
}

pub trait SpeechSynthesizer: Send {
    fn is_supported(&self) -> bool;

    /// Silence whatever is currently being spoken.
    fn cancel(&mut self);

    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

pub trait SpeechRecognizer: Send {
    fn is_supported(&self) -> bool;

    /// Begin capturing one utterance. Results arrive through the client's
    /// `recognition_*` callbacks.
    fn start(&mut self) -> Result<(), SpeechError>;

    fn stop(&mut self);
}

impl<R: SpeechRecognizer + ?Sized> SpeechRecognizer for Box<R> {
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        (**self).start()
    }

    fn stop(&mut self) {
        (**self).stop()
    }
}

/// At most one utterance is audible: the previous one is cancelled first.
pub fn speak(synth: &mut dyn SpeechSynthesizer, text: &str) {
    if !synth.is_supported() {
        return;
    }
    synth.cancel();
    if let Err(err) = synth.speak(text) {
        tracing::warn!(error = %err, "speech synthesis failed");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoSynthesizer;

impl SpeechSynthesizer for NoSynthesizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn cancel(&mut self) {}

    fn speak(&mut self, _text: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoRecognizer;

impl SpeechRecognizer for NoRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&mut self) {}
}

/// Speaks by running an external TTS program (`espeak`, `say`, ...) with the
/// text as its last argument. Needs a tokio runtime.
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    args: Vec<String>,
    current: Option<Utterance>,
}

/// A running TTS process, watched by a task that reaps it on exit or kills
/// it once `stop` fires or is dropped.
#[derive(Debug)]
struct Utterance {
    stop: Option<oneshot::Sender<()>>,
    watcher: JoinHandle<()>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            current: None,
        }
    }

    /// Splits a command line on whitespace. `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// True while the last spawned process has not exited.
    pub fn is_speaking(&self) -> bool {
        self.current
            .as_ref()
            .is_some_and(|utterance| !utterance.watcher.is_finished())
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn cancel(&mut self) {
        if let Some(stop) = self.current.as_mut().and_then(|u| u.stop.take()) {
            // watcher already gone means the process exited
            let _ = stop.send(());
        }
    }

    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let (stop, stopped) = oneshot::channel::<()>();
        let watcher = tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    if let Err(err) = status {
                        tracing::debug!(error = %err, "speech command wait failed");
                    }
                }
                _ = stopped => {
                    if let Err(err) = child.kill().await {
                        tracing::debug!(error = %err, "failed to stop speech command");
                    }
                }
            }
        });

        // dropping the old sender stops any previous process as well
        self.current = Some(Utterance {
            stop: Some(stop),
            watcher,
        });
        Ok(())
    }
}
