//! Command-line arguments.

use std::path::PathBuf;

use anyhow::{Result, bail};

pub const USAGE: &str = "usage: podrow --users <users.json> [--apps <apps.json>] \
                         [--config <podrow.toml>] [--strings <strings.json>] \
                         [--script <events.txt>]";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub users: PathBuf,
    pub apps: Option<PathBuf>,
    pub config: Option<PathBuf>,
    /// Localized string table; without one, string keys are shown as is.
    pub strings: Option<PathBuf>,
    /// Event script; stdin when absent.
    pub script: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut parsed = Args::default();
        let mut users = None;
        let mut iter = args.into_iter();
        while let Some(flag) = iter.next() {
            let slot = match flag.as_str() {
                "--users" => &mut users,
                "--apps" => &mut parsed.apps,
                "--config" => &mut parsed.config,
                "--strings" => &mut parsed.strings,
                "--script" => &mut parsed.script,
                "-h" | "--help" => bail!("{USAGE}"),
                other => bail!("unknown argument {other}\n{USAGE}"),
            };
            let Some(value) = iter.next() else {
                bail!("{flag} needs a value\n{USAGE}");
            };
            *slot = Some(PathBuf::from(value));
        }
        let Some(users) = users else {
            bail!("--users is required\n{USAGE}");
        };
        parsed.users = users;
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn users_only() {
        let args = parse(&["--users", "users.json"]).unwrap();
        assert_eq!(args.users, PathBuf::from("users.json"));
        assert_eq!(args.script, None);
        assert_eq!(args.apps, None);
    }

    #[test]
    fn every_flag() {
        let args = parse(&[
            "--script",
            "events.txt",
            "--users",
            "u.json",
            "--apps",
            "a.json",
            "--config",
            "podrow.toml",
            "--strings",
            "strings.toml",
        ])
        .unwrap();
        assert_eq!(args.users, PathBuf::from("u.json"));
        assert_eq!(args.apps, Some(PathBuf::from("a.json")));
        assert_eq!(args.config, Some(PathBuf::from("podrow.toml")));
        assert_eq!(args.strings, Some(PathBuf::from("strings.toml")));
        assert_eq!(args.script, Some(PathBuf::from("events.txt")));
    }

    #[test]
    fn users_are_required() {
        let err = parse(&["--apps", "a.json"]).unwrap_err();
        assert!(err.to_string().contains("--users is required"));
    }

    #[test]
    fn flag_without_value() {
        let err = parse(&["--users"]).unwrap_err();
        assert!(err.to_string().contains("--users needs a value"));
    }

    #[test]
    fn unknown_flag() {
        let err = parse(&["--users", "u.json", "--verbose"]).unwrap_err();
        assert!(err.to_string().contains("unknown argument --verbose"));
    }
}
