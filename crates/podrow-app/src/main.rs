//! Headless pod row driver.
//!
//! Loads users, kiosk apps, config and strings from disk, replays an event
//! script against the row and prints every host command as a JSON line on
//! stdout. Logs go to stderr; set `RUST_LOG=debug` for the full trace.

mod args;
mod script;
mod sink;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use args::Args;
use podrow_core::PodRow;
use podrow_types::{
    AppRecord, HostSink, KeyEcho, Localizer, PodRowConfig, StringTable, UserRecord,
};
use sink::JsonLines;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let mut row = build_row(&args, JsonLines::new(io::stdout().lock()))?;

    match &args.script {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening script {}", path.display()))?;
            script::run(&mut row, BufReader::new(file))?;
        },
        None => script::run(&mut row, io::stdin().lock())?,
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Build the row from the files named on the command line.
fn build_row<H: HostSink>(args: &Args, host: H) -> Result<PodRow<H>> {
    let config = match &args.config {
        Some(path) => PodRowConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PodRowConfig::default(),
    };
    let strings: Box<dyn Localizer> = match &args.strings {
        Some(path) => Box::new(
            StringTable::load(path)
                .with_context(|| format!("loading strings {}", path.display()))?,
        ),
        None => Box::new(KeyEcho),
    };
    log::info!("Starting pod row ({:?} screen)", config.display);

    let users: Vec<UserRecord> = read_json(&args.users)?;
    let mut row = PodRow::new(config, host, strings);
    row.load_pods(users);
    if let Some(path) = &args.apps {
        let apps: Vec<AppRecord> = read_json(path)?;
        row.set_apps(apps);
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use podrow_types::{DisplayType, HostCommand};

    fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn builds_row_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let users = write(
            dir.path(),
            "users.json",
            r#"[
                {"username": "a@example.com", "displayName": "A"},
                {"username": "b@example.com", "displayName": "B", "signedIn": true}
            ]"#,
        );
        let apps = write(
            dir.path(),
            "apps.json",
            r#"[{"id": "kiosk", "label": "Kiosk"}]"#,
        );
        let config = write(dir.path(), "podrow.toml", "display = \"lock\"\n");
        let strings = write(dir.path(), "strings.toml", "removeUser = \"Remove\"\n");
        let args = Args {
            users,
            apps: Some(apps),
            config: Some(config),
            strings: Some(strings),
            script: None,
        };

        let row = build_row(&args, Vec::<HostCommand>::new()).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.config().display, DisplayType::Lock);
        assert_eq!(row.focused_index(), Some(1));
        assert!(row.host().contains(&HostCommand::KioskAppsLoaded));
    }

    #[test]
    fn missing_users_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args {
            users: dir.path().join("nope.json"),
            ..Args::default()
        };
        let err = build_row(&args, Vec::<HostCommand>::new()).err().unwrap();
        assert!(format!("{err:#}").contains("nope.json"));
    }

    #[test]
    fn bad_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let users = write(dir.path(), "users.json", "[]");
        let config = write(dir.path(), "podrow.toml", "display = \"kiosk\"\n");
        let args = Args {
            users,
            config: Some(config),
            ..Args::default()
        };
        assert!(build_row(&args, Vec::<HostCommand>::new()).is_err());
    }
}
