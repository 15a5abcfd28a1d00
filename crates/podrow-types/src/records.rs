//! Account records pushed by the host.
//!
//! The host sends JSON with camelCase keys; every field except the
//! identifier is optional and defaults to the "plain user" value.

use serde::Deserialize;

/// How a pod authenticates its user. Codes match the host's enum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum AuthType {
    #[default]
    OfflinePassword,
    OnlineSignIn,
    NumericPin,
    UserClick,
    ExpandThenUserClick,
    ForceOfflinePassword,
}

impl AuthType {
    /// Map a host code to an auth type.
    pub fn from_code(code: u8) -> Option<Self> {
        let t = match code {
            0 => AuthType::OfflinePassword,
            1 => AuthType::OnlineSignIn,
            2 => AuthType::NumericPin,
            3 => AuthType::UserClick,
            4 => AuthType::ExpandThenUserClick,
            5 => AuthType::ForceOfflinePassword,
            _ => return None,
        };
        Some(t)
    }

    /// Host code of this auth type.
    pub fn code(self) -> u8 {
        match self {
            AuthType::OfflinePassword => 0,
            AuthType::OnlineSignIn => 1,
            AuthType::NumericPin => 2,
            AuthType::UserClick => 3,
            AuthType::ExpandThenUserClick => 4,
            AuthType::ForceOfflinePassword => 5,
        }
    }

    /// Attribute name used by the pod template.
    pub fn name(self) -> &'static str {
        match self {
            AuthType::OfflinePassword => "offlinePassword",
            AuthType::OnlineSignIn => "onlineSignIn",
            AuthType::NumericPin => "numericPin",
            AuthType::UserClick => "userClick",
            AuthType::ExpandThenUserClick => "expandThenUserClick",
            AuthType::ForceOfflinePassword => "forceOfflinePassword",
        }
    }

    pub fn is_password(self) -> bool {
        matches!(
            self,
            AuthType::OfflinePassword | AuthType::ForceOfflinePassword
        )
    }

    pub fn is_user_click(self) -> bool {
        self == AuthType::UserClick
    }

    pub fn is_online_sign_in(self) -> bool {
        self == AuthType::OnlineSignIn
    }
}

impl TryFrom<u8> for AuthType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        AuthType::from_code(code).ok_or_else(|| format!("unknown auth type code {code}"))
    }
}

/// Multi-profile sign-in restriction attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MultiProfilesPolicy {
    PrimaryOnly,
    OwnerPrimaryOnly,
    #[serde(other)]
    NotAllowed,
}

/// One entry of the public session language list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocaleEntry {
    pub value: String,
    pub title: String,
    /// Set on group headers, which carry no selectable value.
    pub option_group_name: Option<String>,
}

/// One entry of the public session keyboard layout list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyboardLayoutEntry {
    pub value: String,
    pub title: String,
    pub selected: bool,
}

/// A user account (regular, public session, supervised or desktop profile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub display_name: String,
    pub email_address: String,
    pub signed_in: bool,
    pub is_owner: bool,
    pub can_remove: bool,
    pub public_account: bool,
    pub is_desktop_user: bool,
    pub legacy_supervised_user: bool,
    pub child_user: bool,
    #[serde(default = "default_true")]
    pub is_multi_profiles_allowed: bool,
    pub multi_profiles_policy: Option<MultiProfilesPolicy>,
    pub initial_auth_type: Option<AuthType>,
    /// Desktop profiles: the profile is locked and needs a password.
    pub needs_signin: bool,
    pub profile_path: String,
    /// Avatar URL of a desktop profile.
    pub user_image: String,
    pub enterprise_domain: String,
    pub initial_locales: Vec<LocaleEntry>,
    pub initial_locale: String,
    pub initial_multiple_recommended_locales: bool,
}

fn default_true() -> bool {
    true
}

impl UserRecord {
    /// A plain password user, handy for tests and demos.
    pub fn new(username: &str, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: display_name.to_string(),
            email_address: username.to_string(),
            is_multi_profiles_allowed: true,
            can_remove: true,
            ..Self::default()
        }
    }
}

/// A kiosk app shown after the user pods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppRecord {
    pub id: String,
    pub label: String,
    pub icon_url: String,
}

impl AppRecord {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            icon_url: String::new(),
        }
    }
}

/// Icons the host may place next to a pod's input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconId {
    Locked,
    LockedToBeActivated,
    LockedWithProximityHint,
    Unlocked,
    Hardlocked,
    Spinner,
}

impl IconId {
    /// Style class the icon is drawn with.
    pub fn class_name(self) -> &'static str {
        match self {
            IconId::Locked => "custom-icon-locked",
            IconId::LockedToBeActivated => "custom-icon-locked-to-be-activated",
            IconId::LockedWithProximityHint => "custom-icon-locked-with-proximity-hint",
            IconId::Unlocked => "custom-icon-unlocked",
            IconId::Hardlocked => "custom-icon-hardlocked",
            IconId::Spinner => "custom-icon-spinner",
        }
    }

    /// Parse the host's icon id string.
    pub fn from_id(id: &str) -> Option<Self> {
        let icon = match id {
            "locked" => IconId::Locked,
            "locked-to-be-activated" => IconId::LockedToBeActivated,
            "locked-with-proximity-hint" => IconId::LockedWithProximityHint,
            "unlocked" => IconId::Unlocked,
            "hardlocked" => IconId::Hardlocked,
            "spinner" => IconId::Spinner,
            _ => return None,
        };
        Some(icon)
    }
}

/// Tooltip attached to a custom icon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TooltipSpec {
    pub text: String,
    pub autoshow: bool,
}

impl TooltipSpec {
    pub fn new(text: &str, autoshow: bool) -> Self {
        Self {
            text: text.to_string(),
            autoshow,
        }
    }
}

/// Parameters of `showUserPodCustomIcon`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomIconSpec {
    pub id: Option<IconId>,
    pub hardlock_on_click: bool,
    pub is_trial_run: bool,
    pub aria_label: Option<String>,
    pub tooltip: Option<TooltipSpec>,
}
