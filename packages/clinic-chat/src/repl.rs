//! Line-oriented input loop.

use anyhow::Result;
use clinic_chat_core::{ChatSession, ClearOutcome, SendOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::events::format_message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    Clear,
    History,
    Quit,
    Help,
}

pub const HELP_TEXT: &str = "Commands: /clear  reset the conversation, /history  show the transcript, /quit  exit";

pub fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/clear" => Command::Clear,
        "/history" => Command::History,
        "/quit" | "/exit" => Command::Quit,
        "/help" => Command::Help,
        text => Command::Send(text.to_string()),
    }
}

/// Read stdin until EOF or `/quit`, driving `session`.
pub async fn run(session: &ChatSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP_TEXT),
            Command::History => {
                for message in session.messages() {
                    println!("{}", format_message(&message));
                }
            }
            Command::Clear => {
                if let ClearOutcome::Failed(err) = session.clear_chat().await {
                    tracing::debug!("Clear failed: {}", err);
                }
            }
            Command::Send(text) => match session.send_message(&text).await {
                SendOutcome::Replied(_) | SendOutcome::Ignored => {}
                outcome => tracing::debug!("Send finished with {:?}", outcome),
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("/clear"), Command::Clear);
        assert_eq!(parse_command("  /history \n"), Command::History);
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert_eq!(parse_command("/help"), Command::Help);
    }

    #[test]
    fn test_everything_else_is_sent_trimmed() {
        assert_eq!(
            parse_command("  quiero una cita  "),
            Command::Send("quiero una cita".to_string())
        );
        assert_eq!(parse_command(""), Command::Send(String::new()));
    }
}
