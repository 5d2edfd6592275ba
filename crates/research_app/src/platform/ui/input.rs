/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// Anything that is not a `:command` is a topic, passed on verbatim.
    Submit(String),
    Reset,
    Health,
    Help,
    Quit,
    Unknown(String),
}

pub(crate) const HELP_TEXT: &[&str] = &[
    "Type a research topic and press Enter to search.",
    "  :reset   clear the topic and results",
    "  :health  check whether the research API is reachable",
    "  :help    show this help",
    "  :quit    exit (end of input works too)",
];

pub(crate) fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(name) = trimmed.strip_prefix(':') else {
        return Command::Submit(line.to_string());
    };
    match name.to_ascii_lowercase().as_str() {
        "reset" | "r" => Command::Reset,
        "health" => Command::Health,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
