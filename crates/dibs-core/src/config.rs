use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// UAT pool assumed when `DIBS_UATS` is not set.
pub const DEFAULT_UATS: &[&str] = &[
    "astroboy",
    "derbystallion",
    "donkeykong",
    "doubledragon",
    "galaga",
    "ghostbusters",
    "goldeneye",
    "iceclimber",
    "kirby",
    "mariogolf",
    "metroid",
    "mickeymania",
    "mortalkombat",
    "pikmin",
    "quake",
    "starfox",
    "streetfighter",
    "yoshi",
    "zelda",
];

/// Applications under deploy-queue management when `DIBS_APPLICATIONS` is not set.
pub const DEFAULT_APPLICATIONS: &[&str] = &[
    "alpaca",
    "bank-pool",
    "bilcas",
    "bilcas_stub",
    "cashbook",
    "codas",
    "cream",
    "crm_service_layer",
    "dispatcher",
    "fca-frontend",
    "funding_circle_app",
    "loan_engine",
    "loan_fuel",
    "lovelace",
    "marketplace",
    "transfers",
    "uk-gateway",
    "wall-e",
];

/// Case convention applied to resource and application identifiers.
///
/// Whatever the user typed is folded through this before any registry
/// lookup, so the configured name lists and the brain records stay uniform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameCase {
    Lower,
    Title,
}

impl NameCase {
    pub fn fold(self, raw: &str) -> String {
        let lower = raw.to_lowercase();
        match self {
            NameCase::Lower => lower,
            NameCase::Title => {
                let mut chars = lower.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => lower,
                }
            }
        }
    }
}

/// Typed configuration for the bot.
#[derive(Clone, Debug)]
pub struct Config {
    /// Known UAT names, already case-folded.
    pub uat_names: Vec<String>,
    /// Known application names, already case-folded.
    pub applications: Vec<String>,
    pub name_case: NameCase,

    /// Brain snapshot path; `None` keeps state in memory only.
    pub brain_file: Option<PathBuf>,

    /// Identity the shell adapter reports for commands it reads.
    pub shell_user: String,
    pub shell_room: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let name_case = match env_str("DIBS_NAME_CASE").map(|s| s.trim().to_lowercase()) {
            None => NameCase::Lower,
            Some(s) if s.is_empty() || s == "lower" => NameCase::Lower,
            Some(s) if s == "title" => NameCase::Title,
            Some(other) => {
                return Err(Error::Config(format!(
                    "DIBS_NAME_CASE must be `lower` or `title`, got `{other}`"
                )))
            }
        };

        let uat_names = fold_all(
            parse_csv(env_str("DIBS_UATS")).unwrap_or_else(|| defaults(DEFAULT_UATS)),
            name_case,
        );
        let applications = fold_all(
            parse_csv(env_str("DIBS_APPLICATIONS")).unwrap_or_else(|| defaults(DEFAULT_APPLICATIONS)),
            name_case,
        );

        let brain_file = env_path("DIBS_BRAIN_FILE");

        let shell_user = env_str("DIBS_USER")
            .and_then(non_empty)
            .or_else(|| env_str("USER").and_then(non_empty))
            .unwrap_or_else(|| "someone".to_string());
        let shell_room = env_str("DIBS_ROOM")
            .and_then(non_empty)
            .unwrap_or_else(|| "shell".to_string());

        Ok(Self {
            uat_names,
            applications,
            name_case,
            brain_file,
            shell_user,
            shell_room,
        })
    }
}

fn defaults(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn fold_all(names: Vec<String>, case: NameCase) -> Vec<String> {
    names.iter().map(|n| case.fold(n)).collect()
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn parse_csv(v: Option<String>) -> Option<Vec<String>> {
    let v = v?;
    let out = v
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_fold() {
        assert_eq!(NameCase::Lower.fold("goLDENEye"), "goldeneye");
        assert_eq!(NameCase::Lower.fold("bank-pool"), "bank-pool");
    }

    #[test]
    fn title_fold() {
        assert_eq!(NameCase::Title.fold("zelda"), "Zelda");
        assert_eq!(NameCase::Title.fold("ZELDA"), "Zelda");
        assert_eq!(NameCase::Title.fold(""), "");
    }

    #[test]
    fn csv_parsing_trims_and_drops_empties() {
        let parsed = parse_csv(Some("zelda, kirby , ,yoshi".to_string()));
        assert_eq!(
            parsed,
            Some(vec![
                "zelda".to_string(),
                "kirby".to_string(),
                "yoshi".to_string()
            ])
        );
        assert_eq!(parse_csv(Some("  ,  ".to_string())), None);
        assert_eq!(parse_csv(None), None);
    }
}
