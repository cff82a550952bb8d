//! Shell input parsing.

use crate::models::PromptMode;

/// Thread reference typed by the user: a list position (1-based) or an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadRef {
    Index(usize),
    Id(String),
}

impl ThreadRef {
    fn parse(arg: &str) -> Option<Self> {
        let arg = arg.trim();
        if arg.is_empty() {
            return None;
        }
        Some(match arg.parse::<usize>() {
            Ok(n) if n > 0 => ThreadRef::Index(n),
            _ => ThreadRef::Id(arg.to_string()),
        })
    }
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: submit it in the current mode
    Prompt(String),
    New,
    List,
    Show,
    Select(ThreadRef),
    Delete(ThreadRef),
    Filter(String),
    Reload,
    Mode(PromptMode),
    Publish(bool),
    Theme,
    Credits,
    Logout,
    Help,
    Quit,
    /// Recognised slash command used wrongly, or an unknown one
    Unknown(String),
}

pub const HELP: &str = "\
Type a prompt and press Enter to send it to the selected chat.

  /new              start a new chat
  /list             list chats
  /show             show the selected chat
  /select <n|id>    switch chat
  /delete <n|id>    delete a chat
  /filter <text>    list chats matching text
  /reload           reload chats from the server
  /mode text|image  choose what prompts generate
  /publish on|off   publish generated images
  /theme            toggle light/dark
  /credits          show remaining credits
  /logout           sign out
  /quit             exit";

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Prompt(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_lowercase().as_str() {
            "new" => Command::New,
            "list" | "ls" => Command::List,
            "show" => Command::Show,
            "select" | "open" => ThreadRef::parse(arg)
                .map(Command::Select)
                .unwrap_or_else(|| Command::Unknown("/select needs a chat number or id".into())),
            "delete" | "rm" => ThreadRef::parse(arg)
                .map(Command::Delete)
                .unwrap_or_else(|| Command::Unknown("/delete needs a chat number or id".into())),
            "filter" | "find" => Command::Filter(arg.to_string()),
            "reload" => Command::Reload,
            "mode" => match arg.parse::<PromptMode>() {
                Ok(mode) => Command::Mode(mode),
                Err(_) => Command::Unknown("/mode takes 'text' or 'image'".into()),
            },
            "publish" => match arg.to_lowercase().as_str() {
                "on" | "yes" | "true" => Command::Publish(true),
                "off" | "no" | "false" => Command::Publish(false),
                _ => Command::Unknown("/publish takes 'on' or 'off'".into()),
            },
            "theme" => Command::Theme,
            "credits" => Command::Credits,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Unknown(format!("unknown command '/{}', try /help", other)),
        }
    }
}
