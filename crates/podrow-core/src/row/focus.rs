//! Focus and activation.
//!
//! At most one pod is focused. Focusing a pod defocuses and resets every
//! other pod, then hands keyboard focus to the pod's main input. Activation
//! runs the focused pod's primary action and records the pod as the login
//! attempt in flight only if the pod accepted it.

use podrow_types::{EventTarget, HostCommand, HostSink, Modifiers, PodElement};
use podrow_ui::{TabOrder, TabStops};

use super::PodRow;

impl<H: HostSink> PodRow<H> {
    /// Login and lock screens keep a lone pod focused at all times; the
    /// desktop picker and touch view never do.
    pub fn always_focus_single_pod(&self) -> bool {
        !self.config.display.is_desktop() && !self.touch_view && self.pods.len() == 1
    }

    pub fn is_focused(&self, index: usize) -> bool {
        self.focused == Some(index)
    }

    /// Focus the pod at `target`, or clear focus with `None`.
    ///
    /// Focusing the already focused pod does nothing unless `force` is set.
    /// Calls made while a focus change is in progress are dropped.
    pub fn focus_pod(&mut self, target: Option<usize>, force: bool) {
        let target = match target {
            Some(i) if i >= self.pods.len() => {
                log::warn!("Ignoring focus request for missing pod {i}");
                return;
            },
            other => other,
        };
        if self.focused == target && !force {
            if target.is_none() {
                self.clear_errors();
            }
            self.keyboard_activated = false;
            return;
        }
        if self.inside_focus_pod {
            log::debug!("Dropping nested focus change");
            self.keyboard_activated = false;
            return;
        }
        self.inside_focus_pod = true;

        let single = self.always_focus_single_pod();
        for i in 0..self.pods.len() {
            if !single {
                self.pods[i].set_menu_active(false);
            }
            if Some(i) != target {
                let pod = &mut self.pods[i];
                pod.set_menu_hovered(false);
                pod.state.focused = false;
                // Desktop pods fade out while another pod is focused.
                pod.state.faded = pod.is_desktop_user() && target.is_some();
                self.with_pod(i, |pod, ctx| pod.reset(ctx, false));
            }
        }

        if self.focused != target {
            self.clear_errors();
        }

        self.focused = target;
        if let Some(index) = target {
            let pod = &mut self.pods[index];
            pod.state.faded = false;
            pod.state.focused = true;
            if !pod.policy_applied() {
                pod.state.signing_in = false;
                self.focus_pod_input(index);
            } else {
                pod.state.policy_bubble_shown = true;
                self.focus(EventTarget::pod(index));
            }

            // The host loads the pod's wallpaper in response.
            if let Some(username) = self.pods[index].username().map(str::to_string) {
                self.send(HostCommand::FocusPod { username });
            }
            self.first_shown = false;
            self.last_focused = Some(index);
            self.scroll_focused_pod_into_view();
        }

        self.inside_focus_pod = false;
        self.keyboard_activated = false;
    }

    /// Move tab index 1 to the pod's main input and focus it.
    fn focus_pod_input(&mut self, index: usize) {
        let Some(pod) = self.pods.get_mut(index) else {
            return;
        };
        let main = pod.focus_input();
        self.focus(EventTarget::element(index, main));
    }

    /// Move keyboard focus to `target`, as if the renderer focused it.
    ///
    /// Refocusing the element that already has focus is a no-op, unless it
    /// belongs to a pod that lost focus in the meantime (Escape keeps the
    /// element active but clears the focused pod).
    pub fn focus(&mut self, target: EventTarget) {
        let stale = target.pod_index().is_some_and(|i| self.focused != Some(i));
        if self.active == Some(target) && !stale {
            return;
        }
        // Leaving the remove command takes it out of the tab order again.
        if let Some(EventTarget::Pod {
            index,
            element: PodElement::RemoveCommand,
        }) = self.active
        {
            if self.active != Some(target) && !self.disabled {
                if let Some(pod) = self.pods.get_mut(index) {
                    pod.state
                        .tabs
                        .set(PodElement::RemoveCommand, TabOrder::UNREACHABLE);
                }
            }
        }
        self.active = Some(target);
        self.handle_focus(target);
    }

    /// React to an element gaining keyboard focus.
    pub fn handle_focus(&mut self, target: EventTarget) {
        if self.disabled {
            return;
        }
        match target {
            EventTarget::Pod { index, .. } if index >= self.pods.len() => {
                log::warn!("Focus event for missing pod {index}");
            },
            EventTarget::Pod {
                index,
                element: PodElement::Pod,
            } => {
                if self.focused != Some(index) {
                    self.focus_pod(Some(index), false);
                } else if !self.pods[index].policy_applied() {
                    self.focus_pod_input(index);
                } else {
                    self.pods[index].state.policy_bubble_shown = true;
                }
            },
            EventTarget::Pod { index, element } => {
                // A control of an unfocused pod. The action box and its
                // menu take focus without focusing the pod.
                if self.focused != Some(index) && !element.is_action_box() {
                    self.focus_pod(Some(index), false);
                    self.pods[index].state.policy_bubble_shown = false;
                    self.active = Some(target);
                }
            },
            EventTarget::HeaderBar | EventTarget::Outside => {
                if !self.always_focus_single_pod() {
                    self.focus_pod(None, false);
                } else if let Some(index) = self.focused {
                    self.pods[index].state.policy_bubble_shown = false;
                }
            },
        }
    }

    /// Run the pod's primary action; it becomes the activated pod only if
    /// the attempt was actually issued.
    pub fn set_activated_pod(&mut self, index: usize, modifiers: Modifiers) {
        let accepted = self.with_pod(index, |pod, ctx| pod.activate(ctx, modifiers));
        match accepted {
            Some(true) => self.activated = Some(index),
            Some(false) => log::debug!("Pod {index} rejected activation"),
            None => log::warn!("Ignoring activation of missing pod {index}"),
        }
    }

    /// Pod to focus after a rebuild: a signed-in pod, else the first pod not
    /// restricted by policy, else the first pod. The desktop picker only
    /// preselects on request and never a lone pod.
    pub fn preselected_pod(&self) -> Option<usize> {
        if self.config.display.is_desktop() {
            if self.pods.len() == 1 {
                return None;
            }
            return self.preselect_index.filter(|&i| i < self.pods.len());
        }
        self.pods
            .iter()
            .position(|p| p.user().is_some_and(|u| u.signed_in))
            .or_else(|| self.pods.iter().position(|p| !p.policy_applied()))
            .or_else(|| (!self.pods.is_empty()).then_some(0))
    }

    pub fn maybe_preselect_pod(&mut self) {
        let pod = self.preselected_pod();
        self.focus_pod(pod, false);
        if let Some(index) = pod {
            if self.pods[index].policy_applied() {
                self.pods[index].state.policy_bubble_shown = false;
            }
        }
    }

    /// Re-enable the row and reset the pod of the last login attempt.
    pub fn reset(&mut self, take_focus: bool) {
        self.set_disabled(false);
        if let Some(index) = self.activated {
            self.reset_pod(index, take_focus);
        }
    }

    pub fn refocus_current_pod(&mut self) {
        if let Some(index) = self.focused {
            if !self.pods[index].policy_applied() {
                self.focus_pod_input(index);
            }
        }
    }

    /// Clear the focused pod's password and put focus back in it.
    pub fn clear_focused_pod(&mut self) {
        if self.disabled {
            return;
        }
        if let Some(index) = self.focused {
            self.reset_pod(index, true);
        }
    }

    pub(super) fn reset_pod(&mut self, index: usize, take_focus: bool) {
        let element = self
            .with_pod(index, |pod, ctx| pod.reset(ctx, take_focus))
            .flatten();
        if let Some(element) = element {
            self.focus(EventTarget::element(index, element));
        }
    }

    /// Open or close a pod's action box menu. Opening it on an unfocused pod
    /// clears focus first.
    pub(super) fn set_menu_active(&mut self, index: usize, active: bool) {
        let Some(pod) = self.pods.get(index) else {
            return;
        };
        if active && !pod.action_menu().active && self.focused != Some(index) {
            self.focus_pod(None, true);
            self.focus(EventTarget::element(index, PodElement::ActionBoxArea));
        }
        self.pods[index].set_menu_active(active);
    }

    /// Scroll so the focused pod is fully visible, centering it if it is
    /// not.
    pub fn scroll_focused_pod_into_view(&mut self) {
        let Some(index) = self.focused else {
            return;
        };
        let Some(area) = self.visible_area.as_mut() else {
            return;
        };
        let height = i64::from(self.layout.pod_height());
        let padding = i64::from(self.config.layout.keyboard_min_padding);
        let pod_top = i64::from(area.offset_top) + i64::from(self.pods[index].position().top);
        let scroll_top = i64::from(area.scroll_top);
        let client_height = i64::from(area.client_height);
        if pod_top + height + padding <= scroll_top + client_height
            && pod_top - padding >= scroll_top
        {
            return;
        }
        let centered = pod_top - (client_height - height) / 2;
        area.scroll_top = u32::try_from(centered.max(0)).unwrap_or(u32::MAX);
    }

    /// Keyboard traversal order over every visible pod element and the
    /// header bar.
    pub fn tab_sequence(&self) -> Vec<EventTarget> {
        let mut stops = TabStops::new();
        for (index, pod) in self.pods.iter().enumerate() {
            if pod.is_hidden() {
                continue;
            }
            for (element, tab_index) in pod.tab_stops() {
                // Disabled inputs and buttons cannot take focus.
                if self.disabled && element.is_form_control() {
                    continue;
                }
                stops.set(EventTarget::element(index, element), tab_index);
            }
        }
        stops.set(EventTarget::HeaderBar, self.header_bar_tab);
        stops.sequence()
    }
}
