/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Reset,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(name) = trimmed.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };
        // `//text` sends `/text`; a bare `/` is just text
        if let Some(text) = name.strip_prefix('/') {
            return Command::Send(format!("/{text}"));
        }

        match name.split_whitespace().next().unwrap_or("") {
            "" => Command::Send(line.to_string()),
            "reset" => Command::Reset,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

pub fn help_text() -> &'static str {
    "Type a message and press Enter to send it. Start it with // to send a leading /.\n\
     /reset   start the booking over\n\
     /status  show the appointment details collected so far\n\
     /help    show this help\n\
     /quit    leave"
}
