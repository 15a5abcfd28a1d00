//! Localization seam.
//!
//! The pod row never embeds display text. Every label goes through a
//! [`Localizer`], injected when the row is built.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Source of localized display strings.
pub trait Localizer {
    /// Look up a plain string.
    fn get_string(&self, key: &str) -> String;

    /// Look up a string and substitute `$1`, `$2`, ... with `args`.
    fn get_string_f(&self, key: &str, args: &[&str]) -> String;
}

/// Replace `$1`..`$9` placeholders in `template` with `args`.
///
/// `$$` yields a literal `$`. Placeholders without a matching argument are
/// left untouched.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push('$');
            },
            Some(d @ '1'..='9') => {
                let idx = (d as usize) - ('1' as usize);
                chars.next();
                match args.get(idx) {
                    Some(arg) => out.push_str(arg),
                    None => {
                        out.push('$');
                        out.push(d);
                    },
                }
            },
            _ => out.push('$'),
        }
    }
    out
}

/// A flat key → template table, loadable from JSON or TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    entries: HashMap<String, String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse a JSON object of strings.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Parse a TOML table of strings.
    pub fn from_toml(text: &str) -> Result<Self> {
        let entries: HashMap<String, String> = toml::from_str(text)?;
        Ok(Self { entries })
    }

    /// Load a table from disk; `.toml` files are parsed as TOML, anything
    /// else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let table = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&text)?,
            _ => Self::from_json(&text)?,
        };
        log::info!("Loaded {} strings from {}", table.len(), path.display());
        Ok(table)
    }
}

impl Localizer for StringTable {
    fn get_string(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(s) => s.clone(),
            None => {
                log::warn!("Missing string '{key}'");
                key.to_string()
            },
        }
    }

    fn get_string_f(&self, key: &str, args: &[&str]) -> String {
        substitute(&self.get_string(key), args)
    }
}

/// Localizer that returns the key itself, with arguments appended after
/// `:`. Makes rendered output easy to assert on.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyEcho;

impl Localizer for KeyEcho {
    fn get_string(&self, key: &str) -> String {
        key.to_string()
    }

    fn get_string_f(&self, key: &str, args: &[&str]) -> String {
        if args.is_empty() {
            key.to_string()
        } else {
            format!("{key}:{}", args.join(","))
        }
    }
}

impl<T: Localizer + ?Sized> Localizer for Box<T> {
    fn get_string(&self, key: &str) -> String {
        (**self).get_string(key)
    }

    fn get_string_f(&self, key: &str, args: &[&str]) -> String {
        (**self).get_string_f(key, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitute_placeholders() {
        assert_eq!(substitute("Hello $1", &["Ann"]), "Hello Ann");
        assert_eq!(substitute("$2 then $1", &["a", "b"]), "b then a");
        assert_eq!(substitute("cost $$5", &[]), "cost $5");
        assert_eq!(substitute("missing $3", &["a"]), "missing $3");
        assert_eq!(substitute("trailing $", &[]), "trailing $");
    }

    #[test]
    fn table_lookup_and_format() {
        let mut t = StringTable::new();
        t.insert("removeUser", "Remove this user");
        t.insert("podMenuButtonAccessibleName", "Options for $1");
        assert_eq!(t.get_string("removeUser"), "Remove this user");
        assert_eq!(
            t.get_string_f("podMenuButtonAccessibleName", &["Ann"]),
            "Options for Ann"
        );
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        let t = StringTable::new();
        assert_eq!(t.get_string("nope"), "nope");
    }

    #[test]
    fn table_from_json_and_toml() {
        let j = StringTable::from_json(r#"{"a":"A","b":"B $1"}"#).unwrap();
        assert_eq!(j.len(), 2);
        assert_eq!(j.get_string_f("b", &["x"]), "B x");
        let t = StringTable::from_toml("a = \"A\"\n").unwrap();
        assert_eq!(t.get_string("a"), "A");
        assert!(StringTable::from_json("[1,2]").is_err());
    }

    #[test]
    fn key_echo() {
        let k = KeyEcho;
        assert_eq!(k.get_string("passwordHint"), "passwordHint");
        assert_eq!(k.get_string_f("podMenuButtonAccessibleName", &["Ann"]), "podMenuButtonAccessibleName:Ann");
        assert_eq!(k.get_string_f("x", &[]), "x");
    }

    #[test]
    fn boxed_localizer() {
        let b: Box<dyn Localizer> = Box::new(KeyEcho);
        assert_eq!(b.get_string("k"), "k");
    }
}
