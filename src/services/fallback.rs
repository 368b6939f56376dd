// src/services/fallback.rs
use chrono::{Local, NaiveTime};

use crate::message::{ChatReply, ReplyMeta};
use crate::services::ollama::{BackendFailure, BackendReply};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Time,
    Name,
    Unknown,
}

/// Case-insensitive substring match, first hit wins.
pub fn detect_intent(msg: &str) -> Intent {
    let msg_lower = msg.to_lowercase();

    if msg_lower.contains("hello") || msg_lower.contains("hi") {
        Intent::Greeting
    } else if msg_lower.contains("time") {
        Intent::Time
    } else if msg_lower.contains("name") {
        Intent::Name
    } else {
        Intent::Unknown
    }
}

pub fn fallback_response(msg: &str) -> String {
    fallback_response_at(msg, Local::now().time())
}

pub fn fallback_response_at(msg: &str, now: NaiveTime) -> String {
    use Intent::*;

    match detect_intent(msg) {
        Greeting => "Hello! How can I help you today?".to_string(),
        Time => format!("The server time is {}.", now.format("%-I:%M:%S %p")),
        Name => "I'm your friendly local AI chatbot (offline fallback).".to_string(),
        Unknown => "I couldn't reach Ollama and I don't have an offline answer for that.".to_string(),
    }
}

/// Collapses a backend outcome into the reply sent to the client.
pub fn resolve(msg: &str, outcome: Result<BackendReply, BackendFailure>) -> ChatReply {
    match outcome {
        Ok(BackendReply { text }) => ChatReply { reply: text, meta: None },
        Err(failure) => ChatReply {
            reply: fallback_response(msg),
            meta: Some(ReplyMeta {
                error: failure.diagnostic(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn afternoon() -> NaiveTime {
        NaiveTime::from_hms_opt(15, 4, 5).unwrap()
    }

    #[test]
    fn test_detect_intent() {
        assert_eq!(detect_intent("Hello there"), Intent::Greeting);
        assert_eq!(detect_intent("HI"), Intent::Greeting);
        assert_eq!(detect_intent("what time is it"), Intent::Time);
        assert_eq!(detect_intent("what is your name"), Intent::Name);
        assert_eq!(detect_intent("xyz completely unrelated"), Intent::Unknown);
    }

    #[test]
    fn greeting_outranks_other_keywords() {
        assert_eq!(detect_intent("hello, what time is it, name?"), Intent::Greeting);
        // "this" contains "hi"
        assert_eq!(detect_intent("this time"), Intent::Greeting);
        assert_eq!(detect_intent("name the time"), Intent::Time);
    }

    #[test]
    fn fixed_replies() {
        assert_eq!(
            fallback_response("Hello there"),
            "Hello! How can I help you today?"
        );
        assert_eq!(
            fallback_response("what is your name"),
            "I'm your friendly local AI chatbot (offline fallback)."
        );
        assert_eq!(
            fallback_response("xyz completely unrelated"),
            "I couldn't reach Ollama and I don't have an offline answer for that."
        );
    }

    #[test]
    fn time_reply_uses_given_clock() {
        assert_eq!(
            fallback_response_at("what time is it", afternoon()),
            "The server time is 3:04:05 PM."
        );
        assert_eq!(
            fallback_response_at("time?", NaiveTime::from_hms_opt(0, 30, 0).unwrap()),
            "The server time is 12:30:00 AM."
        );
    }

    #[test]
    fn time_reply_tracks_local_clock() {
        let before = Local::now().time();
        let reply = fallback_response("what time is it");
        let after = Local::now().time();

        let stamp = reply
            .strip_prefix("The server time is ")
            .and_then(|rest| rest.strip_suffix('.'))
            .unwrap();
        let parsed = NaiveTime::parse_from_str(stamp, "%-I:%M:%S %p").unwrap();

        // tolerate a midnight wrap between the two reads
        let close = |t: NaiveTime| {
            let secs = (parsed - t).num_seconds().abs();
            secs <= 2 || secs >= 86_398
        };
        assert!(close(before) || close(after), "got {reply}");
    }

    #[test]
    fn resolve_passes_generated_text_through() {
        let reply = resolve(
            "hello",
            Ok(BackendReply {
                text: "Hi from the model".to_string(),
            }),
        );
        assert_eq!(reply.reply, "Hi from the model");
        assert!(reply.meta.is_none());
    }

    #[test]
    fn resolve_falls_back_with_diagnostic() {
        let reply = resolve(
            "what is your name",
            Err(BackendFailure::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: "model crashed".to_string(),
            }),
        );
        assert_eq!(reply.reply, fallback_response("what is your name"));
        assert_eq!(reply.meta.unwrap().error, "model crashed");
    }
}
