//! Custom icon next to a pod's password field, with a hover/autoshow
//! tooltip.
//!
//! The tooltip is wanted while either the pointer has rested on the icon
//! long enough ([`HoverState::HoverTooltip`]) or the host asked for it to
//! pop up on its own ([`AutoshowState::Active`]). It is drawn in the shared
//! [`Bubble`], and only while the owning pod is focused.
//!
//! Other parts of the row hide the bubble without telling the icon, so
//! every transition first reconciles the logical state with what the bubble
//! actually shows.

use podrow_types::{IconId, Key, TimingConfig};

use crate::bubble::{Attachment, Bubble, BubbleAnchor};
use crate::tab_order::TabOrder;
use crate::timer::{OneShot, earliest};

/// Pointer hover state of the icon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    NoHover,
    /// Pointer on the icon, tooltip delay still running.
    Hover,
    /// Pointer on the icon and the tooltip is shown because of it.
    HoverTooltip,
}

/// Automatic tooltip display state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoshowState {
    #[default]
    Disabled,
    /// Waiting for the show delay.
    Enabled,
    /// Shown automatically; hides again after the disable delay.
    Active,
}

/// What activating an interactive icon asks the row to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconAction {
    /// Hard-lock the pod.
    Hardlock,
    /// Record a click on the lock icon during a trial run.
    TrialRunClick,
}

/// What the icon can see of the outside world during a transition.
pub struct IconEnv<'a> {
    pub bubble: &'a mut Bubble,
    pub now: u64,
    /// The owning pod is focused and the picker is visible.
    pub pod_focused: bool,
}

/// Per-pod custom icon controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomIcon {
    anchor: BubbleAnchor,
    icon_id: Option<IconId>,
    aria_label: Option<String>,
    visible: bool,
    hover: HoverState,
    autoshow: AutoshowState,
    text: String,
    action: Option<IconAction>,
    hover_timer: OneShot<HoverState>,
    autoshow_timer: OneShot<AutoshowState>,
    hover_delay_ms: u64,
    autoshow_enable_ms: u64,
    autoshow_disable_ms: u64,
}

impl CustomIcon {
    /// A hidden icon for the pod of `username`.
    pub fn new(username: &str, timing: &TimingConfig) -> Self {
        Self {
            anchor: BubbleAnchor::CustomIcon(username.to_string()),
            icon_id: None,
            aria_label: None,
            visible: false,
            hover: HoverState::NoHover,
            autoshow: AutoshowState::Disabled,
            text: String::new(),
            action: None,
            hover_timer: OneShot::new(),
            autoshow_timer: OneShot::new(),
            hover_delay_ms: timing.hover_delay_ms,
            autoshow_enable_ms: timing.autoshow_enable_ms,
            autoshow_disable_ms: timing.autoshow_disable_ms,
        }
    }

    pub fn anchor(&self) -> &BubbleAnchor {
        &self.anchor
    }

    pub fn icon_id(&self) -> Option<IconId> {
        self.icon_id
    }

    pub fn set_icon(&mut self, id: Option<IconId>) {
        self.icon_id = id;
    }

    pub fn aria_label(&self) -> Option<&str> {
        self.aria_label.as_deref()
    }

    pub fn set_aria_label(&mut self, label: &str) {
        self.aria_label = Some(label.to_string());
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover
    }

    pub fn autoshow_state(&self) -> AutoshowState {
        self.autoshow
    }

    pub fn tooltip_text(&self) -> &str {
        &self.text
    }

    /// The tooltip is logically wanted.
    pub fn tooltip_active(&self) -> bool {
        self.autoshow == AutoshowState::Active || self.hover == HoverState::HoverTooltip
    }

    /// The tooltip is on screen right now.
    pub fn tooltip_shown(&self, bubble: &Bubble) -> bool {
        bubble.is_shown_for(&self.anchor)
    }

    pub fn action(&self) -> Option<IconAction> {
        self.action
    }

    pub fn is_interactive(&self) -> bool {
        self.action.is_some()
    }

    /// Tab index of the icon: only interactive icons are tab stops.
    pub fn tab_index(&self) -> Option<i32> {
        self.action.map(|_| TabOrder::POD_CUSTOM_ICON)
    }

    /// Make the icon interactive (`Some`) or inert (`None`).
    pub fn set_interactive(&mut self, action: Option<IconAction>) {
        self.action = action;
    }

    pub fn has_pending_timers(&self) -> bool {
        self.hover_timer.is_pending() || self.autoshow_timer.is_pending()
    }

    /// When the next timer fires, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        earliest([self.hover_timer.deadline(), self.autoshow_timer.deadline()])
    }

    /// Set the tooltip text and whether it should pop up on its own.
    ///
    /// A tooltip already on screen stays up with the new text.
    pub fn set_tooltip(&mut self, env: &mut IconEnv<'_>, text: &str, autoshow: bool) {
        let state = if autoshow {
            AutoshowState::Enabled
        } else {
            AutoshowState::Disabled
        };
        self.update_autoshow(env, state);
        self.text = text.to_string();
        self.update_tooltip(env);
    }

    /// Hide the icon and forget all tooltip state.
    pub fn hide(&mut self, env: &mut IconEnv<'_>) {
        env.bubble.hide_for(&self.anchor);
        self.hover_timer.cancel();
        self.autoshow_timer.cancel();
        self.hover = HoverState::NoHover;
        self.autoshow = AutoshowState::Disabled;
        self.text.clear();
        self.set_interactive(None);
        self.visible = false;
    }

    /// Stop a tooltip that has not appeared yet; used when the user starts
    /// typing.
    pub fn cancel_delayed_tooltip_show(&mut self, env: &mut IconEnv<'_>) {
        self.update_autoshow(env, AutoshowState::Disabled);
        self.hover_timer.cancel();
    }

    /// Hovering counts as user action: a pending autoshow is dropped. A
    /// tooltip that is already up stays up as a hover tooltip.
    pub fn pointer_enter(&mut self, env: &mut IconEnv<'_>) {
        self.update_hover(env, HoverState::Hover);
        self.update_autoshow(env, AutoshowState::Disabled);
    }

    pub fn pointer_leave(&mut self, env: &mut IconEnv<'_>) {
        self.update_hover(env, HoverState::NoHover);
        if self.autoshow == AutoshowState::Enabled {
            self.update_autoshow(env, AutoshowState::Disabled);
        }
    }

    /// A press on the icon dismisses the tooltip. The press never reaches
    /// the pod.
    pub fn mouse_down(&mut self, env: &mut IconEnv<'_>) {
        self.update_hover(env, HoverState::NoHover);
        self.update_autoshow(env, AutoshowState::Disabled);
    }

    /// Click on the icon; returns the action to run if interactive.
    pub fn click(&self) -> Option<IconAction> {
        self.action
    }

    /// Key press on the focused icon; only Enter activates.
    pub fn key_down(&self, key: Key) -> Option<IconAction> {
        match key {
            Key::Enter => self.action,
            _ => None,
        }
    }

    /// Run every timer due at `env.now`. Returns true if any fired.
    pub fn fire_due(&mut self, env: &mut IconEnv<'_>) -> bool {
        let mut fired = false;
        loop {
            let hover_at = self.hover_timer.deadline().filter(|&at| at <= env.now);
            let auto_at = self.autoshow_timer.deadline().filter(|&at| at <= env.now);
            match (hover_at, auto_at) {
                (None, None) => break,
                (Some(h), Some(a)) if a < h => self.fire_autoshow(env),
                (Some(_), _) => {
                    if let Some(state) = self.hover_timer.take_due(env.now) {
                        self.update_hover(env, state);
                    }
                },
                (None, Some(_)) => self.fire_autoshow(env),
            }
            fired = true;
        }
        fired
    }

    fn fire_autoshow(&mut self, env: &mut IconEnv<'_>) {
        if let Some(state) = self.autoshow_timer.take_due(env.now) {
            self.update_autoshow(env, state);
        }
    }

    /// Reset states that claim a visible tooltip when the bubble is not
    /// showing it.
    fn sanitize(&mut self, env: &IconEnv<'_>) {
        if self.tooltip_shown(env.bubble) {
            return;
        }
        if self.hover == HoverState::HoverTooltip && !self.text.is_empty() {
            self.hover = HoverState::NoHover;
            self.hover_timer.cancel();
        }
        if self.autoshow == AutoshowState::Active {
            self.autoshow = AutoshowState::Disabled;
            self.autoshow_timer.cancel();
        }
    }

    fn update_hover(&mut self, env: &mut IconEnv<'_>, state: HoverState) {
        self.hover_timer.cancel();
        self.sanitize(env);

        if state == HoverState::Hover {
            if self.tooltip_active() {
                self.hover = HoverState::HoverTooltip;
            } else {
                self.hover = HoverState::Hover;
                self.hover_timer
                    .schedule(env.now, self.hover_delay_ms, HoverState::HoverTooltip);
            }
            return;
        }

        self.hover = state;
        self.update_tooltip(env);
    }

    fn update_autoshow(&mut self, env: &mut IconEnv<'_>, state: AutoshowState) {
        self.autoshow_timer.cancel();
        self.sanitize(env);

        if state == AutoshowState::Disabled {
            if self.autoshow != state {
                self.autoshow = state;
                self.update_tooltip(env);
            }
            return;
        }

        if self.tooltip_active() {
            if self.autoshow == AutoshowState::Active {
                // Already up: restart the countdown to hiding it.
                self.autoshow_timer.schedule(
                    env.now,
                    self.autoshow_disable_ms,
                    AutoshowState::Disabled,
                );
            } else {
                self.autoshow = AutoshowState::Disabled;
            }
            return;
        }

        match state {
            AutoshowState::Enabled => self.autoshow_timer.schedule(
                env.now,
                self.autoshow_enable_ms,
                AutoshowState::Active,
            ),
            AutoshowState::Active => self.autoshow_timer.schedule(
                env.now,
                self.autoshow_disable_ms,
                AutoshowState::Disabled,
            ),
            AutoshowState::Disabled => {},
        }
        self.autoshow = state;
        self.update_tooltip(env);
    }

    fn update_tooltip(&mut self, env: &mut IconEnv<'_>) {
        if !self.tooltip_active() || self.text.is_empty() {
            env.bubble.hide_for(&self.anchor);
            return;
        }
        if !self.visible || !env.pod_focused {
            return;
        }
        env.bubble
            .show_for(self.anchor.clone(), &self.text, Attachment::Right);
    }
}
