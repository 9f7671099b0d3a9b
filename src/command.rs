//! Slash command parsing for the terminal front end.
//!
//! Lines starting with `/` drive the widget's buttons (new chat, history,
//! copy). Anything else is a question for the bot.

use crate::runtime::Intent;

/// A parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Start a fresh conversation.
    New,

    /// Show or hide the history list.
    History,

    /// Restore the past conversation at this index.
    Open(usize),

    /// Copy the message at this index.
    Copy(usize),

    /// Print the full widget state as JSON.
    State,

    Help,

    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

impl ChatCommand {
    /// The intent this command sends, if it sends one
    pub fn intent(&self) -> Option<Intent> {
        match self {
            Self::New => Some(Intent::NewConversation),
            Self::History => Some(Intent::ToggleHistory),
            Self::Open(index) => Some(Intent::SelectPast(*index)),
            Self::Copy(index) => Some(Intent::Copy(*index)),
            Self::State | Self::Help | Self::Quit | Self::Invalid(_) => None,
        }
    }
}

/// Parses terminal input for slash commands.
///
/// Returns `None` when the line should be submitted as a question.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let rest = input.trim().strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "new" | "clear" => ChatCommand::New,
        "history" | "h" => ChatCommand::History,
        "open" => parse_index(argument, "/open", ChatCommand::Open),
        "copy" => parse_index(argument, "/copy", ChatCommand::Copy),
        "state" => ChatCommand::State,
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

fn parse_index(
    argument: Option<&str>,
    name: &str,
    constructor: fn(usize) -> ChatCommand,
) -> ChatCommand {
    match argument {
        Some(arg) => match arg.parse::<usize>() {
            Ok(index) => constructor(index),
            Err(_) => ChatCommand::Invalid(format!("{name} expects a non-negative index")),
        },
        None => ChatCommand::Invalid(format!("{name} requires an index")),
    }
}

/// Help text listing every command
pub fn help_text() -> &'static str {
    "\
Available commands:
  /new            Start a new conversation (history is kept)
  /history        Show or hide past conversations
  /open <n>       Restore past conversation n
  /copy <n>       Copy message n to the clipboard
  /state          Print the widget state as JSON
  /help, /?       Show this help
  /quit, /exit    Leave the chat

Anything else is sent as a question."
}
