//! Outbound, one-way commands from the pod row to the host process.
//!
//! The pod row never waits for a reply: the host answers (if at all) by
//! calling back into the inbound API later.

use serde::Serialize;

/// Help topic opened by the public session "learn more" link.
pub const HELP_TOPIC_PUBLIC_SESSION: u32 = 3041033;

/// A fire-and-forget command for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum HostCommand {
    AuthenticateUser { username: String, password: String },
    AttemptUnlock { username: String },
    LaunchPublicSession { username: String, locale: String, keyboard_layout: String },
    LaunchKioskApp { app_id: String, diagnostic_mode: bool },
    RemoveUser { id: String },
    FocusPod { username: String },
    LoadWallpaper { username: String },
    ShowSigninUi { email: String },
    DisableSigninUi,
    ClearErrors,
    LaunchUser { profile_path: String },
    AuthenticatedLaunchUser { profile_path: String, email: String, password: String },
    HardlockPod { username: String },
    RecordClickOnLockIcon { username: String },
    GetPublicSessionKeyboardLayouts { username: String, locale: String },
    LaunchHelpApp { topic: u32 },
    KioskAppsLoaded,
    CheckKioskAppLaunchError,
    LogRemoveUserWarningShown,
}

impl HostCommand {
    /// Wire name of the command, safe to log (never includes a password).
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::AuthenticateUser { .. } => "authenticateUser",
            HostCommand::AttemptUnlock { .. } => "attemptUnlock",
            HostCommand::LaunchPublicSession { .. } => "launchPublicSession",
            HostCommand::LaunchKioskApp { .. } => "launchKioskApp",
            HostCommand::RemoveUser { .. } => "removeUser",
            HostCommand::FocusPod { .. } => "focusPod",
            HostCommand::LoadWallpaper { .. } => "loadWallpaper",
            HostCommand::ShowSigninUi { .. } => "showSigninUi",
            HostCommand::DisableSigninUi => "disableSigninUi",
            HostCommand::ClearErrors => "clearErrors",
            HostCommand::LaunchUser { .. } => "launchUser",
            HostCommand::AuthenticatedLaunchUser { .. } => "authenticatedLaunchUser",
            HostCommand::HardlockPod { .. } => "hardlockPod",
            HostCommand::RecordClickOnLockIcon { .. } => "recordClickOnLockIcon",
            HostCommand::GetPublicSessionKeyboardLayouts { .. } => {
                "getPublicSessionKeyboardLayouts"
            },
            HostCommand::LaunchHelpApp { .. } => "launchHelpApp",
            HostCommand::KioskAppsLoaded => "kioskAppsLoaded",
            HostCommand::CheckKioskAppLaunchError => "checkKioskAppLaunchError",
            HostCommand::LogRemoveUserWarningShown => "logRemoveUserWarningShown",
        }
    }
}

/// Receiver of outbound host commands.
pub trait HostSink {
    /// Deliver one command. Must not call back into the pod row.
    fn send(&mut self, command: HostCommand);
}

/// Recording sink, used by tests and the scripted driver.
impl HostSink for Vec<HostCommand> {
    fn send(&mut self, command: HostCommand) {
        self.push(command);
    }
}

impl<T: HostSink + ?Sized> HostSink for Box<T> {
    fn send(&mut self, command: HostCommand) {
        (**self).send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_records_in_order() {
        let mut sink: Vec<HostCommand> = Vec::new();
        sink.send(HostCommand::ClearErrors);
        sink.send(HostCommand::FocusPod {
            username: "a".into(),
        });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0], HostCommand::ClearErrors);
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<Vec<HostCommand>> = Box::default();
        sink.send(HostCommand::KioskAppsLoaded);
        assert_eq!(sink.as_slice(), &[HostCommand::KioskAppsLoaded]);
    }

    #[test]
    fn serializes_with_wire_names() {
        let cmd = HostCommand::LaunchPublicSession {
            username: "pub@example.com".into(),
            locale: "en-US".into(),
            keyboard_layout: String::new(),
        };
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["command"], "launchPublicSession");
        assert_eq!(json["keyboardLayout"], "");
        assert_eq!(json["locale"], "en-US");
    }

    #[test]
    fn unit_commands_serialize() {
        let json = serde_json::to_string(&HostCommand::KioskAppsLoaded).unwrap();
        assert_eq!(json, r#"{"command":"kioskAppsLoaded"}"#);
    }

    #[test]
    fn name_hides_password() {
        let cmd = HostCommand::AuthenticateUser {
            username: "u".into(),
            password: "hunter2".into(),
        };
        assert_eq!(cmd.name(), "authenticateUser");
        assert!(!cmd.name().contains("hunter2"));
    }

    #[test]
    fn names_match_serialized_tag() {
        let cmds = [
            HostCommand::AttemptUnlock { username: "u".into() },
            HostCommand::LaunchKioskApp {
                app_id: "app".into(),
                diagnostic_mode: true,
            },
            HostCommand::LaunchHelpApp {
                topic: HELP_TOPIC_PUBLIC_SESSION,
            },
            HostCommand::DisableSigninUi,
        ];
        for cmd in cmds {
            let json = serde_json::to_value(&cmd).unwrap();
            assert_eq!(json["command"], cmd.name());
        }
    }
}
