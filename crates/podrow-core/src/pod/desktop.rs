//! Desktop profile picker pods.

use podrow_types::{HostCommand, Localizer, Modifiers, PodElement};

use super::{PodBehavior, PodContext, PodKind, PodState, PodView, user};

/// A browser profile. Unlocked profiles launch on activation; locked ones
/// need their password first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPod;

impl DesktopPod {
    fn needs_signin(state: &PodState) -> bool {
        state.user().is_some_and(|u| u.needs_signin)
    }
}

impl PodBehavior for DesktopPod {
    fn kind(&self) -> PodKind {
        PodKind::Desktop
    }

    fn main_input(&self, state: &PodState) -> PodElement {
        if Self::needs_signin(state) {
            PodElement::PasswordInput
        } else {
            PodElement::NameLabel
        }
    }

    fn activate(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        _modifiers: Modifiers,
    ) -> bool {
        let Some(user) = state.user() else {
            return false;
        };
        if !user.needs_signin {
            ctx.send(HostCommand::LaunchUser {
                profile_path: user.profile_path.clone(),
            });
        } else if state.password.is_empty() {
            return false;
        } else {
            ctx.send(HostCommand::AuthenticatedLaunchUser {
                profile_path: user.profile_path.clone(),
                email: user.email_address.clone(),
                password: state.password.text.clone(),
            });
        }
        state.password.clear();
        true
    }

    fn render(&self, state: &PodState, strings: &dyn Localizer) -> PodView {
        let mut view = user::render_base(state, strings);
        if let Some(u) = state.user() {
            view.image_url = u.user_image.clone();
        }
        view.password_hidden = !Self::needs_signin(state);
        view
    }

    fn element_visible(&self, state: &PodState, element: PodElement) -> bool {
        match element {
            PodElement::PasswordInput => Self::needs_signin(state),
            other => user::element_visible(state, other),
        }
    }
}
