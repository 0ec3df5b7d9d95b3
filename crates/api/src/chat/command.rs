//! Prefixed chat commands (`.add`, `.remove`, `.inventory`, `.initme`, `.help`).

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Inventory,
    /// Optional display name; the author's platform name is used when absent.
    InitMe { display_name: Option<String> },
    /// Unparsed directive text after the command word, trimmed.
    Add(String),
    Remove(String),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Inventory => "inventory",
            Command::InitMe { .. } => "initme",
            Command::Add(_) => "add",
            Command::Remove(_) => "remove",
        }
    }
}

/// Recognize `<prefix><word>` at the start of `content`, followed by whitespace or the end.
///
/// Returns `None` for text without the prefix and for unknown command words.
pub fn parse_command(content: &str, prefix: &str) -> Option<Command> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    let word_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (word, args) = rest.split_at(word_len);
    let args = args.trim();

    let command = match word {
        "help" => Command::Help,
        "inventory" => Command::Inventory,
        "initme" => Command::InitMe {
            display_name: (!args.is_empty()).then(|| args.to_string()),
        },
        "add" => Command::Add(args.to_string()),
        "remove" => Command::Remove(args.to_string()),
        _ => return None,
    };
    Some(command)
}
