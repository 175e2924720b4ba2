//! Slash commands typed at the chat prompt.

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Plain text to send to the assistant.
    Message(String),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear,
    Game(String),
    Games,
    History,
    Stats,
    Tip,
    Speak,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  /clear        clear the chat history
  /game NAME    switch the game context
  /games        list available games
  /history      show the stored conversation
  /stats        show session statistics
  /tip          show a random tip
  /speak        toggle reading replies aloud
  /help         show this help
  /quit         exit";

impl Input {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Input::Message(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        let command = match name.to_ascii_lowercase().as_str() {
            "clear" => Command::Clear,
            "game" if !arg.is_empty() => Command::Game(arg.to_string()),
            "games" | "game" => Command::Games,
            "history" => Command::History,
            "stats" => Command::Stats,
            "tip" => Command::Tip,
            "speak" => Command::Speak,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(name.to_string()),
        };
        Input::Command(command)
    }
}

/// Whether a confirmation answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
