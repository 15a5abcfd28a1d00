//! Platform-agnostic input event types.
//!
//! The host maps its native keyboard, pointer and focus events onto these
//! types. The pod row never sees raw platform input; instead every event
//! names the element it was aimed at through [`EventTarget`].

use serde::{Deserialize, Serialize};

/// Keys the pod row reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Space,
    Escape,
    Tab,
    Backspace,
    /// Printable character typed into the focused element.
    Char(char),
}

impl Key {
    /// Parse a key name as used in event scripts (`left`, `enter`, `esc`, ...).
    ///
    /// A single character that is not a key name maps to [`Key::Char`].
    pub fn from_name(name: &str) -> Option<Key> {
        let key = match name.to_ascii_lowercase().as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "enter" | "return" => Key::Enter,
            "space" => Key::Space,
            "esc" | "escape" => Key::Escape,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => return None,
                }
            },
        };
        Some(key)
    }
}

/// Modifier keys held during a key press or click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only Ctrl held.
    pub const CTRL: Self = Self {
        ctrl: true,
        shift: false,
        alt: false,
    };
}

/// Sub-elements of a pod that can receive input.
///
/// Declaration order is document order inside a pod; tab traversal breaks
/// ties between equal tab indices with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PodElement {
    /// The pod tile itself.
    Pod,
    UserImage,
    NameLabel,
    PasswordInput,
    /// Text shown in place of the password field for user-click auth.
    PasswordLabel,
    CustomIcon,
    LaunchButton,
    ReauthWarning,
    ActionBoxArea,
    ActionBoxMenu,
    RemoveCommand,
    RemoveWarningButton,
    LearnMore,
    LanguageAndInput,
    LanguageSelect,
    KeyboardSelect,
    EnterButton,
}

impl PodElement {
    /// Elements that consume Enter themselves (inputs, buttons and links).
    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            PodElement::PasswordInput
                | PodElement::EnterButton
                | PodElement::LaunchButton
                | PodElement::RemoveWarningButton
                | PodElement::LearnMore
        )
    }

    /// Elements belonging to the action box (menu button and its menu).
    pub fn is_action_box(self) -> bool {
        matches!(
            self,
            PodElement::ActionBoxArea
                | PodElement::ActionBoxMenu
                | PodElement::RemoveCommand
                | PodElement::RemoveWarningButton
        )
    }
}

/// Where an input event landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventTarget {
    /// An element of the pod at `index` (row order).
    Pod { index: usize, element: PodElement },
    /// The login header bar (shutdown, add user, ...).
    HeaderBar,
    /// Anywhere else on the screen.
    Outside,
}

impl EventTarget {
    /// Shorthand for the pod tile itself.
    pub const fn pod(index: usize) -> Self {
        EventTarget::Pod {
            index,
            element: PodElement::Pod,
        }
    }

    /// Shorthand for a sub-element of a pod.
    pub const fn element(index: usize, element: PodElement) -> Self {
        EventTarget::Pod { index, element }
    }

    /// Index of the pod this target is inside, if any.
    pub fn pod_index(&self) -> Option<usize> {
        match self {
            EventTarget::Pod { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The pod sub-element, if the target is inside a pod.
    pub fn pod_element(&self) -> Option<PodElement> {
        match self {
            EventTarget::Pod { element, .. } => Some(*element),
            _ => None,
        }
    }
}

/// A key press aimed at a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub target: EventTarget,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key: Key, target: EventTarget) -> Self {
        Self {
            key,
            target,
            modifiers: Modifiers::default(),
        }
    }

    /// Same event with Ctrl held.
    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}
