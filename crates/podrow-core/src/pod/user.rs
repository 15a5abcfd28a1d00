//! Regular user pods, plus the rendering and reset logic the other user
//! variants build on.

use podrow_types::{AuthType, HostCommand, Localizer, Modifiers, MultiProfilesPolicy, PodElement};

use super::{
    ActionBoxView, PodBehavior, PodContext, PodKind, PodRecord, PodState, PodView, RowRequest,
    UserTypeIcon,
};

/// A password, online sign-in or user-click pod.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPod;

impl PodBehavior for UserPod {
    fn kind(&self) -> PodKind {
        PodKind::User
    }

    fn main_input(&self, state: &PodState) -> PodElement {
        match state.auth_type {
            t if t.is_password() => PodElement::PasswordInput,
            AuthType::UserClick => PodElement::PasswordLabel,
            _ => PodElement::Pod,
        }
    }

    fn activate(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        _modifiers: Modifiers,
    ) -> bool {
        match state.auth_type {
            AuthType::OnlineSignIn => {
                show_signin_ui(state, ctx);
                true
            },
            AuthType::UserClick => {
                ctx.send(HostCommand::DisableSigninUi);
                state.signing_in = true;
                ctx.send(HostCommand::AttemptUnlock {
                    username: state.username().to_string(),
                });
                true
            },
            t if t.is_password() => {
                if state.password.is_empty() {
                    return false;
                }
                ctx.send(HostCommand::DisableSigninUi);
                ctx.send(HostCommand::AuthenticateUser {
                    username: state.username().to_string(),
                    password: state.password.text.clone(),
                });
                true
            },
            other => {
                log::error!(
                    "Activating user pod with invalid authentication type: {}",
                    other.name()
                );
                false
            },
        }
    }

    fn render(&self, state: &PodState, strings: &dyn Localizer) -> PodView {
        let mut view = render_base(state, strings);
        view.user_type_icon = user_type_icon(state);
        view.policy_message = policy_message(state, strings);
        view
    }
}

/// Online sign-in: legacy supervised users get the expired token warning,
/// policy-restricted users get nothing.
pub(super) fn show_signin_ui(state: &PodState, ctx: &mut PodContext<'_>) {
    let Some(user) = state.user() else {
        return;
    };
    if user.legacy_supervised_user && !user.is_desktop_user {
        ctx.request(RowRequest::ShowSupervisedWarning);
    } else if !state.policy_applied {
        ctx.request(RowRequest::ShowSigninUi {
            email: user.email_address.clone(),
        });
    }
}

/// Clear the password and either focus the main input or give tab index 1
/// back to the pod. Policy-restricted pods never take input focus.
pub(super) fn reset(state: &mut PodState, main: PodElement, take_focus: bool) -> Option<PodElement> {
    state.password.clear();
    state.signing_in = false;
    if !take_focus {
        state.reset_tab_order(main);
        None
    } else if state.policy_applied {
        None
    } else {
        Some(state.focus_input(main))
    }
}

pub(super) fn element_visible(state: &PodState, element: PodElement) -> bool {
    let is_public = state.user().is_some_and(|u| u.public_account);
    match element {
        PodElement::Pod | PodElement::UserImage | PodElement::NameLabel => true,
        PodElement::PasswordInput => state.auth_type.is_password(),
        PodElement::PasswordLabel => state.auth_type.is_user_click(),
        PodElement::ReauthWarning => state.auth_type.is_online_sign_in(),
        PodElement::CustomIcon => state.custom_icon.as_ref().is_some_and(|i| i.is_visible()),
        PodElement::ActionBoxArea => !is_public && !matches!(state.record, PodRecord::App(_)),
        PodElement::ActionBoxMenu => state.menu.active,
        PodElement::RemoveCommand => state.menu.active && !state.menu.remove_hidden,
        PodElement::RemoveWarningButton => state.menu.active && state.menu.warning_shown,
        PodElement::LaunchButton
        | PodElement::LearnMore
        | PodElement::LanguageAndInput
        | PodElement::LanguageSelect
        | PodElement::KeyboardSelect
        | PodElement::EnterButton => false,
    }
}

/// Fields every user-backed pod renders the same way.
pub(super) fn render_base(state: &PodState, strings: &dyn Localizer) -> PodView {
    let Some(user) = state.user() else {
        return PodView::default();
    };
    PodView {
        image_url: format!("userimage/{}?id={}", user.username, state.image_salt),
        name: user.display_name.clone(),
        signed_in: user.signed_in,
        auth_type: state.auth_type.name(),
        password_aria_label: strings
            .get_string_f("passwordFieldAccessibleName", &[&user.email_address]),
        password_hidden: !state.auth_type.is_password(),
        password_label: state
            .auth_type
            .is_user_click()
            .then(|| state.auth_value.clone().unwrap_or_default()),
        launch_button_label: None,
        action_box: action_box(state, strings),
        user_type_icon: None,
        policy_message: None,
        public_info: None,
        remove_warning_text: Some(if user.legacy_supervised_user {
            strings.get_string("removeLegacySupervisedUserWarningText")
        } else {
            strings.get_string("removeUserWarningText")
        }),
    }
}

fn action_box(state: &PodState, strings: &dyn Localizer) -> Option<ActionBoxView> {
    let user = state.user()?;
    if user.public_account {
        return None;
    }
    let title_name = if user.is_owner {
        strings.get_string_f("ownerUserPattern", &[&user.display_name])
    } else {
        user.display_name.clone()
    };
    Some(ActionBoxView {
        aria_label: strings.get_string_f("podMenuButtonAccessibleName", &[&user.email_address]),
        title_name,
        title_email: (!user.legacy_supervised_user).then(|| user.email_address.clone()),
        remove_aria_label: strings.get_string("podMenuRemoveItemAccessibleName"),
        remove_label: strings.get_string("removeUser"),
        remove_hidden: !user.can_remove,
    })
}

/// Child beats legacy supervised beats policy; desktop profiles carry no
/// type icon.
pub(super) fn user_type_icon(state: &PodState) -> Option<UserTypeIcon> {
    match &state.record {
        PodRecord::App(_) => Some(UserTypeIcon::App),
        PodRecord::User(u) if u.child_user && !u.is_desktop_user => Some(UserTypeIcon::Child),
        PodRecord::User(u) if u.legacy_supervised_user && !u.is_desktop_user => {
            Some(UserTypeIcon::LegacySupervised)
        },
        PodRecord::User(_) if state.policy_applied => Some(UserTypeIcon::Policy),
        PodRecord::User(_) => None,
    }
}

fn policy_message(state: &PodState, strings: &dyn Localizer) -> Option<String> {
    if user_type_icon(state) != Some(UserTypeIcon::Policy) {
        return None;
    }
    let key = match state.user().and_then(|u| u.multi_profiles_policy) {
        Some(MultiProfilesPolicy::PrimaryOnly) => "multiProfilesPrimaryOnlyPolicyMsg",
        Some(MultiProfilesPolicy::OwnerPrimaryOnly) => "multiProfilesOwnerPrimaryOnlyMsg",
        _ => "multiProfilesNotAllowedPolicyMsg",
    };
    Some(strings.get_string(key))
}
