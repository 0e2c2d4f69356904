//! Parsing of lines typed at the chat prompt.

use std::path::PathBuf;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text to send to the companion.
    Say(String),
    Image(PathBuf),
    Voice,
    Ack,
    Dismiss,
    Invite(String),
    History,
    Stop,
    Help,
    Logout,
    Quit,
    Empty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("/{command} attend un argument : {usage}")]
    MissingArgument {
        command: &'static str,
        usage: &'static str,
    },
    #[error("commande inconnue : /{0} (tape /help)")]
    Unknown(String),
}

pub const HELP: &str = "\
Commandes :
  <texte>           envoyer un message
  /image <chemin>   partager une image
  /voice            démarrer / arrêter l'enregistrement vocal
  /ack              confirmer le message d'urgence
  /dismiss          fermer l'alerte de quota
  /invite <email>   inviter un ami
  /history          afficher / masquer l'historique
  /stop             couper le son
  /logout           se déconnecter
  /quit             quitter";

/// Parse a line. Anything not starting with `/` is sent as-is.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_ascii_lowercase().as_str() {
        "image" | "img" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "image",
                    usage: "/image <chemin>",
                });
            }
            Ok(Command::Image(PathBuf::from(arg)))
        }
        "invite" => {
            if arg.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "invite",
                    usage: "/invite <email>",
                });
            }
            Ok(Command::Invite(arg.to_string()))
        }
        "voice" | "mic" => Ok(Command::Voice),
        "ack" => Ok(Command::Ack),
        "dismiss" => Ok(Command::Dismiss),
        "history" => Ok(Command::History),
        "stop" => Ok(Command::Stop),
        "help" | "?" => Ok(Command::Help),
        "logout" => Ok(Command::Logout),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent_verbatim() {
        assert_eq!(
            parse("  salut Nono ").unwrap(),
            Command::Say("  salut Nono ".to_string())
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), Command::Empty);
        assert_eq!(parse("").unwrap(), Command::Empty);
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse("/image  ~/photos/chat.png").unwrap(),
            Command::Image(PathBuf::from("~/photos/chat.png"))
        );
        assert_eq!(
            parse("/invite ami@example.com").unwrap(),
            Command::Invite("ami@example.com".to_string())
        );
    }

    #[test]
    fn test_missing_argument() {
        let err = parse("/invite").unwrap_err();
        assert_eq!(
            err,
            CommandError::MissingArgument {
                command: "invite",
                usage: "/invite <email>"
            }
        );
        assert!(err.to_string().contains("/invite <email>"));
        assert!(parse("/image   ").is_err());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("/voice").unwrap(), Command::Voice);
        assert_eq!(parse("/ACK").unwrap(), Command::Ack);
        assert_eq!(parse("/dismiss").unwrap(), Command::Dismiss);
        assert_eq!(parse("/history").unwrap(), Command::History);
        assert_eq!(parse("/stop").unwrap(), Command::Stop);
        assert_eq!(parse("/logout").unwrap(), Command::Logout);
        assert_eq!(parse("/quit").unwrap(), Command::Quit);
        assert_eq!(parse("/help").unwrap(), Command::Help);
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("/dance now").unwrap_err();
        assert_eq!(err, CommandError::Unknown("dance".to_string()));
        assert!(err.to_string().contains("/dance"));
    }
}
