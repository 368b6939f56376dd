// src/client/voice.rs
use std::fmt;

use super::speech::SpeechRecognizer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoiceState {
    Idle,
    /// `continuous` sessions restart capture whenever an utterance ends.
    Listening { continuous: bool },
}

/// Something the user should be told about voice input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoiceNotice {
    Unsupported,
    AlreadyActive,
    RecognitionFailed(String),
}

impl fmt::Display for VoiceNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoiceNotice::Unsupported => {
                write!(f, "Speech recognition is not supported on this client.")
            }
            VoiceNotice::AlreadyActive => write!(f, "Voice input is already active. Please wait."),
            VoiceNotice::RecognitionFailed(error) => {
                write!(f, "Speech recognition error: {error}.")
            }
        }
    }
}

/// Single-slot recognition session driven by explicit events.
pub struct VoiceInput<R> {
    recognizer: R,
    state: VoiceState,
}

impl<R: SpeechRecognizer> VoiceInput<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            state: VoiceState::Idle,
        }
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, VoiceState::Listening { .. })
    }

    pub fn start(&mut self, continuous: bool) -> Result<(), VoiceNotice> {
        if !self.recognizer.is_supported() {
            return Err(VoiceNotice::Unsupported);
        }
        if self.is_listening() {
            return Err(VoiceNotice::AlreadyActive);
        }
        if let Err(err) = self.recognizer.start() {
            tracing::debug!(error = %err, "recognizer refused to start");
            return Err(VoiceNotice::AlreadyActive);
        }
        self.state = VoiceState::Listening { continuous };
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.is_listening() {
            self.state = VoiceState::Idle;
            self.recognizer.stop();
        }
    }

    /// Mic button: stop when listening, otherwise start a continuous session.
    pub fn toggle(&mut self) -> Result<(), VoiceNotice> {
        if self.is_listening() {
            self.stop();
            Ok(())
        } else {
            self.start(true)
        }
    }

    /// Capture finished without an explicit stop.
    pub fn recognition_ended(&mut self) {
        match self.state {
            VoiceState::Listening { continuous: true } => {
                if let Err(err) = self.recognizer.start() {
                    tracing::warn!(error = %err, "could not restart speech capture");
                    self.state = VoiceState::Idle;
                }
            }
            VoiceState::Listening { continuous: false } => self.state = VoiceState::Idle,
            VoiceState::Idle => {}
        }
    }

    pub fn recognition_errored(&mut self, error: &str) -> VoiceNotice {
        tracing::warn!(error, "speech recognition error");
        self.state = VoiceState::Idle;
        VoiceNotice::RecognitionFailed(error.to_string())
    }
}
