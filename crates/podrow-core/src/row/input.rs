//! Keyboard and pointer dispatch.
//!
//! Events travel the way they would through the rendered tree: a key press
//! reaches the target element, then its pod, then the row, and stops at the
//! first handler that consumes it. A click is seen by the row first, then
//! the element, then the pod.

use podrow_types::{
    AuthType, EventTarget, HostCommand, HostSink, Key, KeyEvent, Modifiers, PodElement,
};
use podrow_ui::TabOrder;

use super::PodRow;
use crate::pod::{PodKind, PublicSessionPod};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Propagation {
    Continue,
    Stop,
}

use Propagation::{Continue, Stop};

impl<H: HostSink> PodRow<H> {
    /// Dispatch a key press.
    pub fn key_down(&mut self, event: KeyEvent) {
        if self.element_key_down(event) == Stop
            || self.pod_key_down(event) == Stop
            || self.row_key_down(event) == Stop
        {
            return;
        }
        if event.key == Key::Tab {
            self.move_tab_focus(event.modifiers.shift);
        }
    }

    /// Type `text` into whatever holds keyboard focus.
    pub fn type_text(&mut self, text: &str) {
        let target = self.active.unwrap_or(EventTarget::Outside);
        for ch in text.chars() {
            self.key_down(KeyEvent::new(Key::Char(ch), target));
        }
    }

    fn element_key_down(&mut self, event: KeyEvent) -> Propagation {
        let EventTarget::Pod { index, element } = event.target else {
            return Continue;
        };
        if index >= self.pods.len() {
            return Continue;
        }
        let key = event.key;
        let press = matches!(key, Key::Enter | Key::Space);
        match element {
            PodElement::PasswordInput => self.password_key_down(index, key),
            PodElement::CustomIcon => {
                let action = self
                    .pods[index]
                    .custom_icon()
                    .and_then(|icon| icon.key_down(key));
                match action {
                    Some(action) => {
                        self.run_icon_action(index, action);
                        Stop
                    },
                    None => Continue,
                }
            },
            PodElement::ActionBoxArea => self.action_area_key_down(index, key),
            PodElement::RemoveCommand => self.remove_command_key_down(index, key),
            PodElement::RemoveWarningButton => {
                if !press || !self.pods[index].action_menu().active {
                    return Continue;
                }
                self.set_menu_active(index, false);
                self.with_pod(index, |pod, ctx| pod.remove_user(ctx));
                Stop
            },
            PodElement::LearnMore if press => {
                self.with_pod(index, |_, ctx| PublicSessionPod::learn_more(ctx));
                Stop
            },
            PodElement::NameLabel
                if key == Key::Enter && self.pods[index].kind() == PodKind::PublicSession =>
            {
                self.set_activated_pod(index, event.modifiers);
                Stop
            },
            PodElement::EnterButton if press => {
                self.with_public_session(index, |public, state, ctx| public.launch(state, ctx));
                Stop
            },
            PodElement::LaunchButton if press => {
                self.with_pod(index, |pod, ctx| pod.activate(ctx, event.modifiers));
                Stop
            },
            PodElement::LanguageAndInput if press => {
                self.with_public_session(index, |public, _, ctx| {
                    public.transition_to_advanced(ctx)
                });
                Stop
            },
            _ => Continue,
        }
    }

    fn password_key_down(&mut self, index: usize, key: Key) -> Propagation {
        let field = &mut self.pods[index].state.password;
        match key {
            Key::Char(ch) => {
                field.insert(ch);
                // Typing dismisses a tooltip that has not shown yet.
                self.with_icon(index, |icon, env| icon.cancel_delayed_tooltip_show(env));
                Stop
            },
            Key::Backspace => {
                field.backspace();
                self.with_icon(index, |icon, env| icon.cancel_delayed_tooltip_show(env));
                Stop
            },
            Key::Left | Key::Right if !field.is_empty() => {
                field.move_cursor(key == Key::Right);
                Stop
            },
            _ => Continue,
        }
    }

    fn action_area_key_down(&mut self, index: usize, key: Key) -> Propagation {
        if self.pods[index].state.controls_disabled {
            return Continue;
        }
        match key {
            Key::Enter | Key::Space => {
                if self.focused.is_some() {
                    self.set_menu_active(index, true);
                }
                Stop
            },
            Key::Up | Key::Down => {
                if self.pods[index].action_menu().active {
                    self.pods[index]
                        .state
                        .tabs
                        .set(PodElement::RemoveCommand, TabOrder::PAD_MENU_ITEM);
                    self.focus(EventTarget::element(index, PodElement::RemoveCommand));
                }
                Stop
            },
            Key::Escape => {
                self.set_menu_active(index, false);
                Stop
            },
            Key::Tab => {
                if !self.always_focus_single_pod() {
                    self.focus_pod(None, false);
                }
                self.set_menu_active(index, false);
                Continue
            },
            _ => {
                self.set_menu_active(index, false);
                Continue
            },
        }
    }

    fn remove_command_key_down(&mut self, index: usize, key: Key) -> Propagation {
        if self.pods[index].state.controls_disabled {
            return Continue;
        }
        let area = EventTarget::element(index, PodElement::ActionBoxArea);
        match key {
            Key::Enter => {
                self.activate_remove_command(index, true);
                Stop
            },
            Key::Up | Key::Down => Stop,
            Key::Escape => {
                self.focus(area);
                self.set_menu_active(index, false);
                Stop
            },
            _ => {
                self.focus(area);
                self.set_menu_active(index, false);
                Continue
            },
        }
    }

    /// Pick the remove command: confirm first where removal needs a
    /// warning, otherwise remove straight away.
    fn activate_remove_command(&mut self, index: usize, from_keyboard: bool) {
        if self.pods[index].remove_needs_warning() {
            let button = self.with_pod(index, |pod, ctx| pod.show_remove_warning(ctx));
            if let Some(button) = button {
                self.focus(EventTarget::element(index, button));
            }
            return;
        }
        if from_keyboard || self.pods[index].action_menu().active {
            self.with_pod(index, |pod, ctx| pod.remove_user(ctx));
        }
    }

    /// User-click pods sign in on Enter or Space while focused.
    fn pod_key_down(&mut self, event: KeyEvent) -> Propagation {
        let Some(index) = event.target.pod_index() else {
            return Continue;
        };
        let Some(pod) = self.pods.get(index) else {
            return Continue;
        };
        if pod.auth_type() != AuthType::UserClick || pod.state.controls_disabled {
            return Continue;
        }
        if matches!(event.key, Key::Enter | Key::Space) && self.focused == Some(index) {
            self.set_activated_pod(index, event.modifiers);
            return Stop;
        }
        Continue
    }

    /// Row-level keys: arrows move between pods, Enter activates, Escape
    /// clears focus. Returns whether the key was consumed.
    pub fn handle_key_down(&mut self, event: KeyEvent) -> bool {
        self.row_key_down(event) == Stop
    }

    fn row_key_down(&mut self, event: KeyEvent) -> Propagation {
        if self.disabled || self.pods.is_empty() {
            return Continue;
        }
        let editing = match event.target {
            EventTarget::Pod {
                index,
                element: PodElement::PasswordInput,
            } => self
                .pods
                .get(index)
                .is_some_and(|p| !p.password().is_empty()),
            _ => false,
        };
        match event.key {
            Key::Left | Key::Right if !editing => {
                self.keyboard_activated = true;
                let next = self.adjacent_pod(event.key == Key::Right);
                self.focus_pod(next, false);
                Stop
            },
            Key::Enter => {
                let Some(index) = self.focused else {
                    return Continue;
                };
                let in_password =
                    event.target == EventTarget::element(index, PodElement::PasswordInput);
                let plain = match event.target {
                    EventTarget::Pod { element, .. } => !element.is_form_control(),
                    EventTarget::HeaderBar => false,
                    EventTarget::Outside => true,
                };
                if in_password || plain {
                    self.set_activated_pod(index, event.modifiers);
                    return Stop;
                }
                Continue
            },
            Key::Escape => {
                if !self.always_focus_single_pod() {
                    self.focus_pod(None, false);
                }
                Continue
            },
            _ => Continue,
        }
    }

    /// Next visible pod in the given direction, wrapping at the ends.
    fn adjacent_pod(&self, forward: bool) -> Option<usize> {
        let n = self.pods.len();
        let mut index = match (self.focused, forward) {
            (Some(i), true) => (i + 1) % n,
            (Some(i), false) => (i + n - 1) % n,
            (None, true) => 0,
            (None, false) => n - 1,
        };
        for _ in 0..n {
            if !self.pods[index].is_hidden() {
                return Some(index);
            }
            index = if forward { (index + 1) % n } else { (index + n - 1) % n };
        }
        None
    }

    /// Default Tab behaviour: move along the tab sequence.
    fn move_tab_focus(&mut self, backward: bool) {
        let sequence = self.tab_sequence();
        if sequence.is_empty() {
            return;
        }
        let len = sequence.len();
        let current = self
            .active
            .and_then(|active| sequence.iter().position(|t| *t == active));
        let next = match (current, backward) {
            (Some(i), false) => (i + 1) % len,
            (Some(i), true) => (i + len - 1) % len,
            (None, false) => 0,
            (None, true) => len - 1,
        };
        self.focus(sequence[next]);
    }

    // -- pointer -------------------------------------------------------------

    /// A full click: press, focus follows the press, release.
    pub fn click(&mut self, target: EventTarget, modifiers: Modifiers) {
        if self.handle_mouse_down(target) {
            self.focus_pressed(target);
        }
        self.handle_click(target, modifiers);
    }

    /// Pointer press. Returns whether keyboard focus should move to the
    /// pressed element.
    pub fn handle_mouse_down(&mut self, target: EventTarget) -> bool {
        match target {
            EventTarget::Pod { index, .. } if index >= self.pods.len() => false,
            EventTarget::Pod {
                index,
                element: PodElement::CustomIcon,
            } => {
                self.with_icon(index, |icon, env| icon.mouse_down(env));
                false
            },
            EventTarget::Pod { index, element } => {
                if !element.is_action_box() && element != PodElement::LearnMore {
                    // A user-click pod signs in only when clicked while
                    // already focused.
                    self.pods[index].state.user_click_auth_allowed = self.focused == Some(index);
                }
                true
            },
            EventTarget::HeaderBar => true,
            EventTarget::Outside => {
                // Pressing empty space blurs whatever had keyboard focus.
                self.active = Some(EventTarget::Outside);
                false
            },
        }
    }

    /// Move keyboard focus to the pressed element, or to the closest
    /// focusable container: the action box button for its menu, otherwise
    /// the pod.
    fn focus_pressed(&mut self, target: EventTarget) {
        match target {
            EventTarget::Pod { index, element } => {
                let pod = &self.pods[index];
                let tab_index = pod.tab_index(element);
                let focusable = if element.is_action_box() {
                    element == PodElement::ActionBoxArea || tab_index.is_some_and(|i| i >= 0)
                } else {
                    tab_index.is_some()
                        && pod.element_visible(element)
                        && !(element.is_form_control() && pod.state.controls_disabled)
                };
                let element = match (focusable, element.is_action_box()) {
                    (true, _) => element,
                    (false, true) => PodElement::ActionBoxArea,
                    (false, false) => PodElement::Pod,
                };
                self.focus(EventTarget::element(index, element));
            },
            other => self.focus(other),
        }
    }

    /// Pointer click, after the press.
    pub fn handle_click(&mut self, target: EventTarget, modifiers: Modifiers) {
        self.row_click(target);
        let EventTarget::Pod { index, element } = target else {
            return;
        };
        if index >= self.pods.len() {
            return;
        }
        if self.element_click(index, element, modifiers) == Stop {
            return;
        }
        self.pod_click(index, modifiers);
    }

    fn row_click(&mut self, target: EventTarget) {
        if self.disabled {
            return;
        }
        let in_menu = target.pod_element().is_some_and(PodElement::is_action_box);
        if !in_menu {
            for pod in &mut self.pods {
                pod.set_menu_active(false);
            }
        }

        let single = self.always_focus_single_pod();
        let pod = target.pod_index().filter(|&i| i < self.pods.len());
        if pod.is_none() && !single {
            self.focus_pod(None, false);
        }
        if let Some(index) = pod {
            self.pods[index].set_menu_hovered(true);
        }

        // A lone pod takes focus back.
        if single && pod.is_none() && target != EventTarget::HeaderBar {
            self.focus_pod(self.focused, true);
            if let Some(index) = self.focused {
                let pod = &mut self.pods[index];
                pod.state.policy_bubble_shown = false;
                pod.set_menu_hovered(false);
            }
        }
    }

    fn element_click(
        &mut self,
        index: usize,
        element: PodElement,
        modifiers: Modifiers,
    ) -> Propagation {
        match element {
            PodElement::CustomIcon => {
                if let Some(action) = self.pods[index].custom_icon().and_then(|i| i.click()) {
                    self.run_icon_action(index, action);
                }
                Stop
            },
            PodElement::ActionBoxArea => {
                if !self.disabled {
                    let active = self.pods[index].action_menu().active;
                    self.set_menu_active(index, !active);
                }
                Stop
            },
            PodElement::RemoveCommand => {
                self.activate_remove_command(index, false);
                Stop
            },
            PodElement::RemoveWarningButton => {
                if self.pods[index].action_menu().active {
                    self.set_menu_active(index, false);
                    self.with_pod(index, |pod, ctx| pod.remove_user(ctx));
                }
                Stop
            },
            PodElement::ActionBoxMenu => Stop,
            PodElement::LearnMore => {
                self.with_pod(index, |_, ctx| PublicSessionPod::learn_more(ctx));
                Stop
            },
            PodElement::EnterButton => {
                self.with_public_session(index, |public, state, ctx| public.launch(state, ctx));
                Continue
            },
            PodElement::LaunchButton => {
                self.with_pod(index, |pod, ctx| pod.activate(ctx, modifiers));
                Stop
            },
            PodElement::LanguageAndInput => {
                self.with_public_session(index, |public, _, ctx| {
                    public.transition_to_advanced(ctx)
                });
                Continue
            },
            PodElement::ReauthWarning => {
                self.set_activated_pod(index, modifiers);
                Stop
            },
            _ => Continue,
        }
    }

    fn pod_click(&mut self, index: usize, modifiers: Modifiers) {
        if self.disabled {
            return;
        }
        match self.pods[index].kind() {
            PodKind::User => {
                let pod = &self.pods[index];
                if pod.action_menu().active {
                    return;
                }
                let allowed = pod.state.user_click_auth_allowed;
                match pod.auth_type() {
                    AuthType::OnlineSignIn => {
                        self.with_pod(index, |pod, ctx| pod.show_signin_ui(ctx));
                    },
                    AuthType::UserClick if allowed => self.set_activated_pod(index, modifiers),
                    _ => {},
                }
                if self.pods[index].policy_applied() {
                    self.pods[index].state.policy_bubble_shown = true;
                }
            },
            PodKind::PublicSession => {
                self.focus_pod(Some(index), false);
                self.set_activated_pod(index, modifiers);
            },
            PodKind::Desktop => {
                self.clear_errors();
                self.last_focused = Some(index);
                let pod = &self.pods[index];
                let needs_signin = pod.user().is_some_and(|u| u.needs_signin);
                if !needs_signin && !pod.action_menu().active {
                    self.with_pod(index, |pod, ctx| pod.activate(ctx, modifiers));
                }
                let pod = &self.pods[index];
                if pod.auth_type() == AuthType::UserClick {
                    if let Some(user) = pod.user() {
                        let username = user.email_address.clone();
                        self.send(HostCommand::AttemptUnlock { username });
                    }
                }
            },
            PodKind::KioskApp => {
                self.clear_errors();
                self.last_focused = Some(index);
                self.with_pod(index, |pod, ctx| pod.activate(ctx, modifiers));
            },
        }
    }

    /// Pointer moved over `target`.
    pub fn handle_mouse_move(&mut self, target: EventTarget) {
        if self.disabled {
            return;
        }
        let pod = target.pod_index().filter(|&i| i < self.pods.len());

        // An action box button loses focus once the pointer leaves its pod.
        if let Some(EventTarget::Pod {
            index,
            element: PodElement::ActionBoxArea,
        }) = self.active
        {
            if pod != Some(index) {
                self.focus(EventTarget::pod(index));
            }
        }

        if let Some(index) = pod {
            self.pods[index].set_menu_hovered(true);
        }
        for (i, p) in self.pods.iter_mut().enumerate() {
            if Some(i) != pod && !p.action_menu().active {
                p.set_menu_hovered(false);
            }
        }
    }

    /// Pointer entered a pod's custom icon.
    pub fn icon_pointer_enter(&mut self, index: usize) {
        self.with_icon(index, |icon, env| icon.pointer_enter(env));
    }

    /// Pointer left a pod's custom icon.
    pub fn icon_pointer_leave(&mut self, index: usize) {
        self.with_icon(index, |icon, env| icon.pointer_leave(env));
    }
}
