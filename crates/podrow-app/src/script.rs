//! Event scripts.
//!
//! One command per line; blank lines and `#` comments are skipped. Targets
//! are written `outside`, `header`, `<index>` for a pod tile or
//! `<index>:<element>` for one of its elements (`0:password-input`).
//! `key` and `click` accept a trailing `ctrl`.

use std::io::{BufRead, Write};

use anyhow::Context;

use podrow_core::PodRow;
use podrow_types::{
    AuthType, CustomIconSpec, EventTarget, HostSink, IconId, Key, KeyEvent, Modifiers,
    PodElement, PodRowError, Result, TooltipSpec,
};

use crate::sink::JsonLines;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Key press; without a target it goes to the focused element.
    Key {
        key: Key,
        target: Option<EventTarget>,
        modifiers: Modifiers,
    },
    Type(String),
    Click {
        target: EventTarget,
        modifiers: Modifiers,
    },
    Hover(EventTarget),
    Unhover(EventTarget),
    Tick(u64),
    Icon {
        username: String,
        icon: IconId,
        tooltip: Option<String>,
    },
    Autoshow {
        username: String,
        text: String,
    },
    HideIcon(String),
    AuthType {
        username: String,
        auth_type: AuthType,
        value: Option<String>,
    },
    Resize(u32, u32),
    /// Run the before-show and after-show hooks.
    Show,
    Hide,
    /// Print the row snapshot.
    Dump,
}

fn script_error(msg: impl Into<String>) -> PodRowError {
    PodRowError::Script(msg.into())
}

/// First word of `s` and the trimmed remainder.
fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

fn required<'a>(word: &'a str, what: &str, verb: &str) -> Result<&'a str> {
    if word.is_empty() {
        return Err(script_error(format!("{verb}: missing {what}")));
    }
    Ok(word)
}

fn optional_text(rest: &str) -> Option<String> {
    let rest = rest.trim_end();
    (!rest.is_empty()).then(|| rest.to_string())
}

fn parse_number<T: std::str::FromStr>(word: &str, what: &str) -> Result<T> {
    word.parse()
        .map_err(|_| script_error(format!("bad {what}: {word:?}")))
}

pub fn parse_target(word: &str) -> Result<EventTarget> {
    match word {
        "outside" => return Ok(EventTarget::Outside),
        "header" => return Ok(EventTarget::HeaderBar),
        _ => {},
    }
    let (index, element) = match word.split_once(':') {
        Some((index, element)) => (index, Some(element)),
        None => (word, None),
    };
    let index: usize = parse_number(index, "pod index")?;
    let Some(element) = element else {
        return Ok(EventTarget::pod(index));
    };
    let element: PodElement =
        serde_json::from_value(serde_json::Value::String(element.to_string()))
            .map_err(|_| script_error(format!("unknown pod element {element:?}")))?;
    Ok(EventTarget::element(index, element))
}

/// Optional target and `ctrl` flag after a key name or click.
fn parse_target_and_modifiers(rest: &str) -> Result<(Option<EventTarget>, Modifiers)> {
    let mut target = None;
    let mut modifiers = Modifiers::default();
    for word in rest.split_whitespace() {
        if word == "ctrl" {
            modifiers.ctrl = true;
        } else if target.is_none() {
            target = Some(parse_target(word)?);
        } else {
            return Err(script_error(format!("unexpected {word:?}")));
        }
    }
    Ok((target, modifiers))
}

impl Command {
    /// Parse one script line. Blank lines and comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (verb, rest) = split_word(line);
        let command = match verb {
            "key" => {
                let (name, rest) = split_word(rest);
                let name = required(name, "key name", verb)?;
                let key = Key::from_name(name)
                    .ok_or_else(|| script_error(format!("unknown key {name:?}")))?;
                let (target, modifiers) = parse_target_and_modifiers(rest)?;
                Command::Key {
                    key,
                    target,
                    modifiers,
                }
            },
            "type" => Command::Type(required(rest, "text", verb)?.to_string()),
            "click" => {
                let (target, modifiers) = parse_target_and_modifiers(rest)?;
                let target = target.ok_or_else(|| script_error("click: missing target"))?;
                Command::Click { target, modifiers }
            },
            "hover" => Command::Hover(parse_target(required(rest, "target", verb)?)?),
            "unhover" => Command::Unhover(parse_target(required(rest, "target", verb)?)?),
            "tick" => Command::Tick(parse_number(required(rest, "duration", verb)?, "duration")?),
            "icon" => {
                let (username, rest) = split_word(rest);
                let (id, rest) = split_word(rest);
                let username = required(username, "username", verb)?.to_string();
                let id = required(id, "icon id", verb)?;
                let icon = IconId::from_id(id)
                    .ok_or_else(|| script_error(format!("unknown icon {id:?}")))?;
                Command::Icon {
                    username,
                    icon,
                    tooltip: optional_text(rest),
                }
            },
            "autoshow" => {
                let (username, text) = split_word(rest);
                Command::Autoshow {
                    username: required(username, "username", verb)?.to_string(),
                    text: required(text, "text", verb)?.to_string(),
                }
            },
            "hide-icon" => Command::HideIcon(required(rest, "username", verb)?.to_string()),
            "auth-type" => {
                let (username, rest) = split_word(rest);
                let (code, rest) = split_word(rest);
                let username = required(username, "username", verb)?.to_string();
                let code: u8 = parse_number(required(code, "code", verb)?, "auth type code")?;
                let auth_type = AuthType::from_code(code)
                    .ok_or_else(|| script_error(format!("unknown auth type code {code}")))?;
                Command::AuthType {
                    username,
                    auth_type,
                    value: optional_text(rest),
                }
            },
            "resize" => {
                let (w, h) = split_word(rest);
                Command::Resize(
                    parse_number(required(w, "width", verb)?, "width")?,
                    parse_number(required(h, "height", verb)?, "height")?,
                )
            },
            "show" => Command::Show,
            "hide" => Command::Hide,
            "dump" => Command::Dump,
            other => return Err(script_error(format!("unknown command {other:?}"))),
        };
        Ok(Some(command))
    }
}

/// Apply one command to the row. `Dump` is left to the caller.
pub fn apply<H: HostSink>(row: &mut PodRow<H>, command: Command) -> Result<()> {
    match command {
        Command::Key {
            key,
            target,
            modifiers,
        } => {
            let target = target
                .or_else(|| row.active_element())
                .unwrap_or(EventTarget::Outside);
            row.key_down(KeyEvent {
                key,
                target,
                modifiers,
            });
        },
        Command::Type(text) => row.type_text(&text),
        Command::Click { target, modifiers } => row.click(target, modifiers),
        Command::Hover(target) => {
            row.handle_mouse_move(target);
            if let EventTarget::Pod {
                index,
                element: PodElement::CustomIcon,
            } = target
            {
                row.icon_pointer_enter(index);
            }
        },
        Command::Unhover(target) => {
            if let EventTarget::Pod {
                index,
                element: PodElement::CustomIcon,
            } = target
            {
                row.icon_pointer_leave(index);
            }
            row.handle_mouse_move(EventTarget::Outside);
        },
        Command::Tick(ms) => row.advance(ms),
        Command::Icon {
            username,
            icon,
            tooltip,
        } => {
            let spec = CustomIconSpec {
                id: Some(icon),
                tooltip: tooltip.map(|text| TooltipSpec::new(&text, false)),
                ..CustomIconSpec::default()
            };
            row.show_user_pod_custom_icon(&username, spec)?;
        },
        Command::Autoshow { username, text } => {
            let spec = CustomIconSpec {
                tooltip: Some(TooltipSpec::new(&text, true)),
                ..CustomIconSpec::default()
            };
            row.show_user_pod_custom_icon(&username, spec)?;
        },
        Command::HideIcon(username) => row.hide_user_pod_custom_icon(&username)?,
        Command::AuthType {
            username,
            auth_type,
            value,
        } => row.set_auth_type(&username, auth_type, value)?,
        Command::Resize(width, height) => row.on_window_resize(width, height),
        Command::Show => {
            row.handle_before_show();
            row.handle_after_show();
        },
        Command::Hide => row.handle_hide(),
        Command::Dump => {},
    }
    Ok(())
}

/// Replay a script against the row. Malformed lines abort the run; calls
/// the row rejects are logged and skipped.
pub fn run<W: Write>(row: &mut PodRow<JsonLines<W>>, input: impl BufRead) -> anyhow::Result<()> {
    let mut replayed = 0;
    for (n, line) in input.lines().enumerate() {
        let line = line.context("reading script")?;
        let Some(command) =
            Command::parse(&line).with_context(|| format!("script line {}", n + 1))?
        else {
            continue;
        };
        replayed += 1;
        if command == Command::Dump {
            let snapshot = row.snapshot();
            row.host_mut().write_line(&snapshot)?;
            continue;
        }
        if let Err(e) = apply(row, command) {
            log::warn!("Script line {}: {e}", n + 1);
        }
    }
    log::info!("Replayed {replayed} script commands");
    Ok(())
}
