//! Parsing of the chat command surface into a tagged union.
//!
//! Parsing is a separate step from the registry logic: handlers receive a
//! `Command` and never touch raw text. Identifiers are captured as typed,
//! not yet case-folded; folding happens against the configured convention
//! at dispatch time.

use std::sync::OnceLock;

use regex::Regex;

/// A parsed chat command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Deploy(DeployCommand),
    Uat(UatCommand),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployCommand {
    Help,
    Schedule { app: String },
    Unschedule { app: String },
    Start { app: String },
    Complete { app: String },
    Cancel { app: String },
    Next { app: String },
    Status { app: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UatCommand {
    Help,
    Grab { name: String },
    Release { name: String },
    Steal { name: String },
    Status { query: StatusQuery },
    Default { scope: DefaultScope },
}

/// What a `uat status` line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusQuery {
    /// `uat status all`
    All,
    /// `uat status <names>`, already split on commas/whitespace.
    Names(Vec<String>),
    /// Bare `uat status`: the room's default list, or everything.
    RoomDefault,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefaultScope {
    All,
    Names(Vec<String>),
}

fn deploy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*deploy\s+(help|schedule|unschedule|start|complete|cancel|next|status)(?:\s+([\w-]+))?\s*$",
        )
        .expect("deploy command pattern is valid")
    })
}

fn uat_single_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*uat\s+(help|grab|release|steal)(?:\s+(\w+))?\s*$")
            .expect("uat command pattern is valid")
    })
}

fn uat_status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*uat\s+status([\w\s,-]*)$").expect("uat status pattern is valid")
    })
}

fn uat_default_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*uat\s+default\s+([\w\s,-]+)$").expect("uat default pattern is valid")
    })
}

fn list_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s,]+").expect("list separator pattern is valid"))
}

/// Split a `uat status`/`uat default` argument on commas and whitespace.
fn split_names(raw: &str) -> Vec<String> {
    list_separator()
        .split(raw.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Parse one line of chat. `None` means the line is not for us and is left
/// to other handlers.
pub fn parse(text: &str) -> Option<Command> {
    if let Some(caps) = deploy_re().captures(text) {
        let keyword = caps[1].to_lowercase();
        if keyword == "help" {
            return Some(Command::Deploy(DeployCommand::Help));
        }

        let app = caps.get(2)?.as_str().to_string();
        let cmd = match keyword.as_str() {
            "schedule" => DeployCommand::Schedule { app },
            "unschedule" => DeployCommand::Unschedule { app },
            "start" => DeployCommand::Start { app },
            "complete" => DeployCommand::Complete { app },
            "cancel" => DeployCommand::Cancel { app },
            "next" => DeployCommand::Next { app },
            "status" => DeployCommand::Status { app },
            _ => return None,
        };
        return Some(Command::Deploy(cmd));
    }

    // `uat status` before the single-name commands: its argument is a free
    // list and may be empty.
    if let Some(caps) = uat_status_re().captures(text) {
        let arg = caps[1].trim();
        let query = if arg.is_empty() {
            StatusQuery::RoomDefault
        } else if arg.eq_ignore_ascii_case("all") {
            StatusQuery::All
        } else {
            StatusQuery::Names(split_names(arg))
        };
        return Some(Command::Uat(UatCommand::Status { query }));
    }

    if let Some(caps) = uat_default_re().captures(text) {
        let arg = caps[1].trim();
        let scope = if arg.eq_ignore_ascii_case("all") {
            DefaultScope::All
        } else {
            DefaultScope::Names(split_names(arg))
        };
        return Some(Command::Uat(UatCommand::Default { scope }));
    }

    if let Some(caps) = uat_single_re().captures(text) {
        let keyword = caps[1].to_lowercase();
        if keyword == "help" {
            return Some(Command::Uat(UatCommand::Help));
        }

        let name = caps.get(2)?.as_str().to_string();
        let cmd = match keyword.as_str() {
            "grab" => UatCommand::Grab { name },
            "release" => UatCommand::Release { name },
            "steal" => UatCommand::Steal { name },
            _ => return None,
        };
        return Some(Command::Uat(cmd));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deploy_commands() {
        assert_eq!(
            parse("deploy schedule alpaca"),
            Some(Command::Deploy(DeployCommand::Schedule {
                app: "alpaca".to_string()
            }))
        );
        assert_eq!(
            parse("deploy start bank-pool"),
            Some(Command::Deploy(DeployCommand::Start {
                app: "bank-pool".to_string()
            }))
        );
        assert_eq!(
            parse("deploy status crm_service_layer"),
            Some(Command::Deploy(DeployCommand::Status {
                app: "crm_service_layer".to_string()
            }))
        );
        assert_eq!(parse("deploy help"), Some(Command::Deploy(DeployCommand::Help)));
    }

    #[test]
    fn deploy_keywords_are_case_insensitive_and_names_kept_raw() {
        assert_eq!(
            parse("DEPLOY Schedule aLPaca"),
            Some(Command::Deploy(DeployCommand::Schedule {
                app: "aLPaca".to_string()
            }))
        );
    }

    #[test]
    fn deploy_requires_an_application() {
        assert_eq!(parse("deploy schedule"), None);
        assert_eq!(parse("deploy ship alpaca"), None);
    }

    #[test]
    fn parses_uat_single_name_commands() {
        assert_eq!(
            parse("uat grab goLDENEye"),
            Some(Command::Uat(UatCommand::Grab {
                name: "goLDENEye".to_string()
            }))
        );
        assert_eq!(
            parse("uat release starfox"),
            Some(Command::Uat(UatCommand::Release {
                name: "starfox".to_string()
            }))
        );
        assert_eq!(
            parse("uat steal zelda"),
            Some(Command::Uat(UatCommand::Steal {
                name: "zelda".to_string()
            }))
        );
        assert_eq!(parse("uat help"), Some(Command::Uat(UatCommand::Help)));
        assert_eq!(parse("uat grab"), None);
    }

    #[test]
    fn parses_uat_status_variants() {
        assert_eq!(
            parse("uat status"),
            Some(Command::Uat(UatCommand::Status {
                query: StatusQuery::RoomDefault
            }))
        );
        assert_eq!(
            parse("uat status all"),
            Some(Command::Uat(UatCommand::Status {
                query: StatusQuery::All
            }))
        );
        assert_eq!(
            parse("uat status starfox, donkeykong"),
            Some(Command::Uat(UatCommand::Status {
                query: StatusQuery::Names(vec![
                    "starfox".to_string(),
                    "donkeykong".to_string()
                ])
            }))
        );
        assert_eq!(
            parse("uat status goldeneye starfox"),
            Some(Command::Uat(UatCommand::Status {
                query: StatusQuery::Names(vec![
                    "goldeneye".to_string(),
                    "starfox".to_string()
                ])
            }))
        );
    }

    #[test]
    fn parses_uat_default_variants() {
        assert_eq!(
            parse("uat default all"),
            Some(Command::Uat(UatCommand::Default {
                scope: DefaultScope::All
            }))
        );
        assert_eq!(
            parse("uat default zelda, kirby yoshi"),
            Some(Command::Uat(UatCommand::Default {
                scope: DefaultScope::Names(vec![
                    "zelda".to_string(),
                    "kirby".to_string(),
                    "yoshi".to_string()
                ])
            }))
        );
        assert_eq!(parse("uat default"), None);
    }

    #[test]
    fn other_chatter_is_not_ours() {
        assert_eq!(parse("good morning everyone"), None);
        assert_eq!(parse("deployment is stuck"), None);
        assert_eq!(parse("uat"), None);
    }
}
