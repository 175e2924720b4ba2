mod cli;
mod commands;
mod render;

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use gamepal_chat::tips::random_tip;
use gamepal_chat::{
    ChatTransport, ChatWidget, ClearOutcome, HttpTransport, SessionClient, SubmitOutcome,
    VoiceBridge, CLEAR_PROMPT,
};
use gamepal_core::config::{WidgetVariant, GENERAL_GAME};
use gamepal_core::GamepalConfig;

use crate::cli::CliArgs;
use crate::commands::{is_yes, Command, Input, HELP};
use crate::render::TerminalSink;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = GamepalConfig::load_or_default(&config_file);

    // Tracing. Logs go to stderr so they stay out of the conversation.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting Gamepal v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    config.server.base_url = args.resolve_server(&config.server.base_url);
    if args.voice {
        config.widget.variant = WidgetVariant::Voice;
    }

    // Widget.
    let transport = HttpTransport::from_config(&config.server)?;
    tracing::info!(base_url = %transport.base_url(), "Chat server configured");

    let mut widget = ChatWidget::new(SessionClient::new(transport), config.widget.clone())
        .with_sink(Box::new(TerminalSink::stdout()));
    if config.widget.variant == WidgetVariant::Voice {
        // No speech capabilities in a terminal; the bridge reports both as unsupported.
        widget = widget
            .with_voice(VoiceBridge::unsupported().with_speak_replies(config.voice.speak_replies));
    }

    if let Some(ref game) = args.game {
        if let Err(e) = widget.select_game(game) {
            println!("⚠ {}", e);
        }
    }

    let status = widget.start().await;
    println!("Status: {}", status.label());
    println!("{}", random_tip());
    println!("Type /help for commands.");

    run(&widget, &config).await?;

    tracing::info!("Gamepal stopped");
    Ok(())
}

/// Read lines from stdin until EOF or `/quit`.
async fn run<T: ChatTransport>(
    widget: &ChatWidget<T>,
    config: &GamepalConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match Input::parse(&line) {
            Input::Message(text) => {
                if let SubmitOutcome::Busy = widget.submit(&text).await {
                    println!("⏳ Still waiting for the previous reply.");
                }
                continue;
            }
            Input::Command(command) => command,
        };

        match command {
            Command::Clear => {
                print!("{} [y/N] ", CLEAR_PROMPT);
                std::io::stdout().flush()?;
                let answer = lines.next_line().await?.unwrap_or_default();
                let yes = is_yes(&answer);
                match widget.clear(&move |_: &str| yes).await {
                    Ok(ClearOutcome::Declined) => println!("Cancelled."),
                    Ok(ClearOutcome::Cleared { .. }) => {}
                    Err(e) => println!("❌ Failed to clear chat history: {}", e),
                }
            }
            Command::Game(name) => match widget.select_game(&name) {
                Ok(game) => println!("🎯 Game context: {}", game),
                Err(e) => println!("⚠ {}", e),
            },
            Command::Games => print_games(widget, config),
            Command::History => match widget.client().history().await {
                Ok(entries) if entries.is_empty() => println!("No history yet."),
                Ok(entries) => {
                    for entry in entries {
                        println!("[{}] ({})", entry.timestamp, entry.game);
                        println!("  You: {}", entry.user);
                        println!("  Assistant: {}", entry.assistant);
                    }
                }
                Err(e) => println!("❌ Failed to load history: {}", e),
            },
            Command::Stats => match widget.client().stats().await {
                Ok(stats) => {
                    println!("Session: {}", stats.session_id);
                    println!("Messages: {}", stats.total_messages);
                    println!("Games: {}", stats.games_discussed.join(", "));
                }
                Err(e) => println!("❌ Failed to load stats: {}", e),
            },
            Command::Tip => println!("{}", random_tip()),
            Command::Speak => {
                if widget.voice_output_supported() {
                    let on = widget.toggle_speech_output();
                    println!("Speech output {}", if on { "on" } else { "off" });
                } else {
                    println!("Speech output is not available here.");
                }
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command /{}. Type /help.", name),
        }
    }
    Ok(())
}

fn print_games<T: ChatTransport>(widget: &ChatWidget<T>, config: &GamepalConfig) {
    if widget.variant() == WidgetVariant::Voice {
        println!("Voice mode always uses the {} context.", GENERAL_GAME);
        return;
    }
    let current = widget.game();
    for game in std::iter::once(GENERAL_GAME).chain(config.widget.games.iter().map(String::as_str)) {
        let marker = if game == current { "*" } else { " " };
        println!("{} {}", marker, game);
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
