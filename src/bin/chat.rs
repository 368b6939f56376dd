use anyhow::{Context, Result};
use clap::Parser;
use ollama_chat::client::{
    ChatClient,
    speech::CommandSynthesizer,
    transcript::{MessageRole, Transcript},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chat", about = "Terminal client for the ollama-chat server")]
struct Cli {
    /// Base URL of the chat server
    #[arg(long, env = "CHAT_SERVER", default_value = "http://localhost:3000")]
    server: String,

    /// Speak every reply
    #[arg(long)]
    auto_speak: bool,

    /// Text-to-speech command; the reply is appended as the last argument
    #[arg(long, env = "CHAT_TTS_COMMAND")]
    tts_command: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut client = ChatClient::new(&cli.server).with_auto_speak(cli.auto_speak);
    if let Some(synth) = cli.tts_command.as_deref().and_then(CommandSynthesizer::from_command_line) {
        tracing::info!(program = synth.program(), args = ?synth.args(), "speaking replies through command");
        client = client.with_synthesizer(synth);
    }

    client.greet();
    let mut printed = print_new(client.transcript(), 0);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                match line.trim() {
                    "/quit" | "/exit" => return Ok(()),
                    "/mic" => {
                        if let Err(notice) = client.toggle_voice_input() {
                            println!("! {notice}");
                        }
                    }
                    "/speak" => {
                        let auto_speak = !client.auto_speak();
                        client.set_auto_speak(auto_speak);
                        println!("! auto-speak {}", if auto_speak { "on" } else { "off" });
                    }
                    "/health" => match client.health().await {
                        Ok(health) => println!(
                            "! {} is {}, ollama reachable: {}",
                            client.server(),
                            health.status,
                            health.ollama
                        ),
                        Err(err) => println!("! {err}"),
                    },
                    _ => {
                        client.set_input(line);
                        client.send_input();
                    }
                }
            }
            Some(_) = client.next_reply() => {}
        }
        printed = print_new(client.transcript(), printed);
    }

    // stdin closed: let outstanding replies land
    while client.next_reply().await.is_some() {
        printed = print_new(client.transcript(), printed);
    }

    Ok(())
}

fn print_new(transcript: &Transcript, from: usize) -> usize {
    for message in &transcript.messages()[from..] {
        let who = match message.role {
            MessageRole::User => "you",
            MessageRole::Bot => "bot",
        };
        println!("{who}> {}", message.content);
    }
    transcript.len()
}
