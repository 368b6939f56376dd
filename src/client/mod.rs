// src/client/mod.rs
//! Chat client: keeps the transcript and input field, talks to `/api/chat`,
//! and drives the optional speech capabilities.
pub mod speech;
pub mod transcript;
pub mod voice;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::message::{ChatRequest, HealthResponse};
use speech::{NoRecognizer, NoSynthesizer, SpeechRecognizer, SpeechSynthesizer};
use transcript::{MessageRole, Transcript};
use voice::{VoiceInput, VoiceNotice, VoiceState};

pub const GREETING: &str = "Hi there, type a message or /mic to speak.";
pub const NETWORK_ERROR: &str = "Network error";
pub const NO_REPLY: &str = "No reply";
pub const NO_SPEECH: &str = "No speech detected. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to chat server failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Body of a `/api/chat` answer, success or not.
#[derive(Debug, Deserialize)]
struct ServerReply {
    #[serde(default)]
    reply: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ServerReply {
    fn render(self) -> String {
        match (self.reply, self.error) {
            (Some(reply), _) if !reply.is_empty() => reply,
            (_, Some(error)) => format!("Error: {error}"),
            _ => NO_REPLY.to_string(),
        }
    }
}

/// Outcome of one spawned round trip, delivered in completion order.
type Completion = Result<String, ClientError>;

pub struct ChatClient {
    http: reqwest::Client,
    server: String,
    transcript: Transcript,
    input: String,
    auto_speak: bool,
    synthesizer: Box<dyn SpeechSynthesizer>,
    voice: VoiceInput<Box<dyn SpeechRecognizer>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl ChatClient {
    pub fn new(server: impl Into<String>) -> Self {
        let server: String = server.into();
        let recognizer: Box<dyn SpeechRecognizer> = Box::new(NoRecognizer);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            http: reqwest::Client::new(),
            server: server.trim_end_matches('/').to_string(),
            transcript: Transcript::new(),
            input: String::new(),
            auto_speak: false,
            synthesizer: Box::new(NoSynthesizer),
            voice: VoiceInput::new(recognizer),
            completions_tx,
            completions_rx,
            in_flight: 0,
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: impl SpeechSynthesizer + 'static) -> Self {
        self.synthesizer = Box::new(synthesizer);
        self
    }

    pub fn with_recognizer(mut self, recognizer: impl SpeechRecognizer + 'static) -> Self {
        let recognizer: Box<dyn SpeechRecognizer> = Box::new(recognizer);
        self.voice = VoiceInput::new(recognizer);
        self
    }

    pub fn with_auto_speak(mut self, auto_speak: bool) -> Self {
        self.auto_speak = auto_speak;
        self
    }

    pub fn set_auto_speak(&mut self, auto_speak: bool) {
        self.auto_speak = auto_speak;
    }

    pub fn auto_speak(&self) -> bool {
        self.auto_speak
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Requests sent whose reply has not been appended yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn greet(&mut self) {
        self.transcript.append(MessageRole::Bot, GREETING);
    }

    /// Enter / Send: submit whatever is in the input field.
    pub fn send_input(&mut self) -> bool {
        let text = self.input.clone();
        self.submit(&text)
    }

    /// Appends the user entry and starts the round trip in the background.
    /// Returns `false` when the text was blank and nothing was sent.
    ///
    /// Must be called inside a tokio runtime. Earlier requests may still be
    /// outstanding; their replies are picked up by [`ChatClient::next_reply`].
    pub fn submit(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.transcript.append(MessageRole::User, text);
        self.input.clear();

        let http = self.http.clone();
        let url = format!("{}/api/chat", self.server);
        let message = text.to_string();
        let completions = self.completions_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = request_reply(&http, &url, message).await;
            // the receiver lives as long as the client
            let _ = completions.send(outcome);
        });
        true
    }

    /// Waits for the next reply to land, appends it and returns it.
    /// `None` when nothing is outstanding.
    pub async fn next_reply(&mut self) -> Option<String> {
        if self.in_flight == 0 {
            return None;
        }
        let outcome = self.completions_rx.recv().await?;
        self.in_flight -= 1;
        Some(self.finish(outcome))
    }

    fn finish(&mut self, outcome: Completion) -> String {
        let reply = match outcome {
            Ok(reply) => {
                if self.auto_speak {
                    self.speak(&reply);
                }
                reply
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat request failed");
                NETWORK_ERROR.to_string()
            }
        };

        self.transcript.append(MessageRole::Bot, reply.clone());
        reply
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let health = self
            .http
            .get(format!("{}/api/health", self.server))
            .send()
            .await?
            .json()
            .await?;
        Ok(health)
    }

    pub fn speak(&mut self, text: &str) {
        speech::speak(self.synthesizer.as_mut(), text);
    }

    pub fn voice_state(&self) -> VoiceState {
        self.voice.state()
    }

    pub fn start_voice_input(&mut self) -> Result<(), VoiceNotice> {
        self.voice.start(true)
    }

    pub fn stop_voice_input(&mut self) {
        self.voice.stop();
    }

    pub fn toggle_voice_input(&mut self) -> Result<(), VoiceNotice> {
        self.voice.toggle()
    }

    /// A recognized utterance is shown in the input field and submitted.
    pub fn recognition_result(&mut self, transcript: &str) -> bool {
        let text = transcript.trim();
        if text.is_empty() {
            self.transcript.append(MessageRole::Bot, NO_SPEECH);
            return false;
        }
        self.input = text.to_string();
        self.submit(text)
    }

    pub fn recognition_ended(&mut self) {
        self.voice.recognition_ended();
    }

    pub fn recognition_errored(&mut self, error: &str) -> VoiceNotice {
        self.voice.recognition_errored(error)
    }
}

async fn request_reply(http: &reqwest::Client, url: &str, message: String) -> Completion {
    let body: ServerReply = http
        .post(url)
        .json(&ChatRequest {
            message: Some(message),
        })
        .send()
        .await?
        .json()
        .await?;
    Ok(body.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> String {
        serde_json::from_str::<ServerReply>(body).unwrap().render()
    }

    #[test]
    fn renders_reply_error_or_placeholder() {
        assert_eq!(parse(r#"{"reply":"hey","meta":{"error":"x"}}"#), "hey");
        assert_eq!(
            parse(r#"{"error":"No message provided"}"#),
            "Error: No message provided"
        );
        assert_eq!(parse(r#"{"reply":""}"#), NO_REPLY);
        assert_eq!(parse("{}"), NO_REPLY);
    }

    #[test]
    fn trims_server_url() {
        let client = ChatClient::new("http://localhost:3000/");
        assert_eq!(client.server(), "http://localhost:3000");
        assert_eq!(client.voice_state(), VoiceState::Idle);
    }

    #[tokio::test]
    async fn blank_input_sends_nothing() {
        let mut client = ChatClient::new("http://127.0.0.1:9");
        client.set_input("   ");
        assert!(!client.send_input());
        assert_eq!(client.in_flight(), 0);
        assert!(client.transcript().is_empty());
        assert_eq!(client.input(), "   ");
        assert_eq!(client.next_reply().await, None);
    }
}
