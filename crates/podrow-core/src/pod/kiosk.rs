//! Kiosk app pods, appended after the user pods.

use podrow_types::{HostCommand, Localizer, Modifiers, PodElement};

use super::{PodBehavior, PodContext, PodKind, PodRecord, PodState, PodView, RowRequest, user};

#[derive(Debug, Clone, Copy, Default)]
pub struct KioskAppPod;

impl PodBehavior for KioskAppPod {
    fn kind(&self) -> PodKind {
        PodKind::KioskApp
    }

    fn main_input(&self, _state: &PodState) -> PodElement {
        PodElement::LaunchButton
    }

    /// Ctrl asks to launch in diagnostic mode, which needs confirming.
    fn activate(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        modifiers: Modifiers,
    ) -> bool {
        let PodRecord::App(app) = &state.record else {
            return false;
        };
        if modifiers.ctrl {
            ctx.request(RowRequest::ConfirmDiagnosticMode {
                app_id: app.id.clone(),
                label: app.label.clone(),
            });
        } else {
            ctx.send(HostCommand::LaunchKioskApp {
                app_id: app.id.clone(),
                diagnostic_mode: false,
            });
        }
        true
    }

    fn render(&self, state: &PodState, strings: &dyn Localizer) -> PodView {
        let PodRecord::App(app) = &state.record else {
            return PodView::default();
        };
        PodView {
            image_url: app.icon_url.clone(),
            name: app.label.clone(),
            auth_type: state.auth_type.name(),
            password_hidden: true,
            launch_button_label: Some(strings.get_string("launchAppButton")),
            user_type_icon: user::user_type_icon(state),
            ..PodView::default()
        }
    }

    fn element_visible(&self, state: &PodState, element: PodElement) -> bool {
        match element {
            PodElement::LaunchButton => true,
            PodElement::PasswordInput | PodElement::PasswordLabel | PodElement::ReauthWarning => {
                false
            },
            other => user::element_visible(state, other),
        }
    }
}
