use std::str::FromStr;

/// Commands handed to the background actor. Filter changes never leave the
/// UI thread (they are pure recomputation over the in-memory dataset), so
/// only work that touches the network or the app lifecycle shows up here.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Refresh,
    Help,
    Quit,
    Unknown(String),
}

impl FromStr for AppCommand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        if parts.is_empty() {
            return Ok(AppCommand::Unknown("".to_string()));
        }

        match parts[0] {
            "refresh" | "reload" => Ok(AppCommand::Refresh),
            "help" | "h" => Ok(AppCommand::Help),
            "quit" | "q" | "exit" => Ok(AppCommand::Quit),
            _ => Ok(AppCommand::Unknown(format!("Unknown command: {}", parts[0]))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands_and_aliases() {
        assert_eq!("refresh".parse(), Ok(AppCommand::Refresh));
        assert_eq!("reload".parse(), Ok(AppCommand::Refresh));
        assert_eq!("h".parse(), Ok(AppCommand::Help));
        assert_eq!("exit".parse(), Ok(AppCommand::Quit));
    }

    #[test]
    fn unknown_input_is_reported_not_rejected() {
        assert_eq!(
            "frobnicate now".parse(),
            Ok(AppCommand::Unknown(
                "Unknown command: frobnicate".to_string()
            ))
        );
    }
}
