//! Public session pods.
//!
//! Activating the pod expands it in place to show an enter button; an
//! optional "advanced" pane adds language and keyboard layout selection.
//! Expanded pods are wider than the grid cell, so expanding shifts the pod
//! left until it fits inside the row and collapsing moves it back.

use podrow_types::{
    HostCommand, KeyboardLayoutEntry, LocaleEntry, Localizer, Modifiers, PodElement,
    host::HELP_TOPIC_PUBLIC_SESSION,
};
use podrow_ui::{GuardedTransition, OneShot, TabOrder, timer::earliest};

use super::{PodBehavior, PodContext, PodKind, PodState, PodView, RowRequest, user};

#[derive(Debug, Clone, Default)]
pub struct PublicSessionPod {
    expanded: bool,
    advanced: bool,
    animating: bool,
    transitioning_to_advanced: bool,
    usual_left: Option<u32>,
    enter_disabled: bool,
    locales: Vec<LocaleEntry>,
    selected_locale: String,
    manually_changed: bool,
    multiple_recommended: bool,
    keyboard_layouts: Vec<KeyboardLayoutEntry>,
    selected_layout: String,
    loaded_locale: Option<String>,
    expand_wait: GuardedTransition,
    advanced_tick: OneShot<()>,
    advanced_wait: GuardedTransition,
}

impl PublicSessionPod {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(super) fn initialize(&mut self, state: &mut PodState, ctx: &mut PodContext<'_>) {
        state.tabs.set(PodElement::LanguageSelect, TabOrder::POD_INPUT);
        state.tabs.set(PodElement::KeyboardSelect, TabOrder::POD_INPUT);
        state.tabs.set(PodElement::LanguageAndInput, TabOrder::POD_INPUT);
        let Some(user) = state.user() else {
            return;
        };
        let locales = user.initial_locales.clone();
        let default = user.initial_locale.clone();
        let multiple = user.initial_multiple_recommended_locales;
        self.populate_language_select(state, ctx, locales, &default, multiple);
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    /// The expand animation is still running.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_transitioning_to_advanced(&self) -> bool {
        self.transitioning_to_advanced
    }

    /// Left position the pod had before it was expanded.
    pub fn usual_left(&self) -> Option<u32> {
        self.usual_left
    }

    pub fn is_enter_disabled(&self) -> bool {
        self.enter_disabled
    }

    pub fn locales(&self) -> &[LocaleEntry] {
        &self.locales
    }

    pub fn selected_locale(&self) -> &str {
        &self.selected_locale
    }

    pub fn keyboard_layouts(&self) -> &[KeyboardLayoutEntry] {
        &self.keyboard_layouts
    }

    pub fn selected_keyboard_layout(&self) -> &str {
        &self.selected_layout
    }

    /// Locale the keyboard list was loaded for.
    pub fn loaded_locale(&self) -> Option<&str> {
        self.loaded_locale.as_deref()
    }

    fn main_input_for(expanded: bool) -> PodElement {
        if expanded {
            PodElement::EnterButton
        } else {
            PodElement::NameLabel
        }
    }

    pub(crate) fn set_expanded(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        expanded: bool,
    ) {
        if self.expanded == expanded {
            return;
        }
        state.reset_tab_order(Self::main_input_for(self.expanded));
        self.expanded = expanded;
        if expanded {
            if self.multiple_recommended {
                self.advanced = true;
            }
            self.usual_left = Some(state.position.left);
            self.make_space(state, ctx);
        } else if let Some(left) = self.usual_left {
            state.position.left = left;
        }
        self.animating = true;
        self.expand_wait.start(ctx.now, ctx.timing.expand_transition_ms);
    }

    fn make_space(&self, state: &mut PodState, ctx: &PodContext<'_>) {
        let layout = ctx.layout.config();
        let width = if self.advanced {
            layout.public_expanded_advanced_width
        } else {
            layout.public_expanded_basic_width
        };
        let limit = ctx.row_width.saturating_sub(ctx.layout.row_padding());
        if state.position.left + width > limit {
            state.position.left = limit.saturating_sub(width);
        }
    }

    /// Open the advanced pane one tick from now.
    pub(crate) fn transition_to_advanced(&mut self, ctx: &mut PodContext<'_>) {
        self.transitioning_to_advanced = true;
        self.advanced_tick.schedule(ctx.now, 0, ());
    }

    fn finish_expand(&mut self, ctx: &mut PodContext<'_>) {
        self.animating = false;
        ctx.request(RowRequest::RefocusActive);
    }

    fn finish_advanced(&mut self, ctx: &mut PodContext<'_>) {
        self.transitioning_to_advanced = false;
        ctx.request(RowRequest::Focus(PodElement::LanguageSelect));
    }

    /// Replace the language list. A language the user picked by hand stays
    /// selected; otherwise `default` is.
    pub(crate) fn populate_language_select(
        &mut self,
        state: &PodState,
        ctx: &mut PodContext<'_>,
        locales: Vec<LocaleEntry>,
        default: &str,
        multiple_recommended: bool,
    ) {
        let wanted = if self.manually_changed {
            self.selected_locale.clone()
        } else {
            default.to_string()
        };
        let mut selectable = locales.iter().filter(|l| l.option_group_name.is_none());
        let selected = if locales
            .iter()
            .any(|l| l.option_group_name.is_none() && l.value == wanted)
        {
            wanted
        } else {
            selectable.next().map(|l| l.value.clone()).unwrap_or_default()
        };
        self.locales = locales;
        self.selected_locale = selected;
        self.multiple_recommended = multiple_recommended;
        self.request_keyboard_layouts(state, ctx);
    }

    fn request_keyboard_layouts(&self, state: &PodState, ctx: &mut PodContext<'_>) {
        if self.loaded_locale.as_deref() == Some(self.selected_locale.as_str()) {
            return;
        }
        ctx.send(HostCommand::GetPublicSessionKeyboardLayouts {
            username: state.username().to_string(),
            locale: self.selected_locale.clone(),
        });
    }

    /// Replace the keyboard layout list. Lists for a locale that is no
    /// longer selected are dropped.
    pub(crate) fn populate_keyboard_select(&mut self, locale: &str, list: Vec<KeyboardLayoutEntry>) {
        if locale != self.selected_locale {
            log::debug!("Dropping keyboard layouts for stale locale {locale}");
            return;
        }
        self.loaded_locale = Some(locale.to_string());
        self.selected_layout = list
            .iter()
            .find(|k| k.selected)
            .or_else(|| list.first())
            .map(|k| k.value.clone())
            .unwrap_or_default();
        self.keyboard_layouts = list;
    }

    /// The user picked a language.
    pub(crate) fn select_language(
        &mut self,
        state: &PodState,
        ctx: &mut PodContext<'_>,
        locale: &str,
    ) -> bool {
        let known = self
            .locales
            .iter()
            .any(|l| l.option_group_name.is_none() && l.value == locale);
        if !known {
            log::warn!("Unknown locale {locale} for public session pod");
            return false;
        }
        self.selected_locale = locale.to_string();
        self.manually_changed = true;
        self.request_keyboard_layouts(state, ctx);
        true
    }

    pub(crate) fn select_keyboard_layout(&mut self, layout: &str) -> bool {
        if !self.keyboard_layouts.iter().any(|k| k.value == layout) {
            log::warn!("Unknown keyboard layout {layout} for public session pod");
            return false;
        }
        self.selected_layout = layout.to_string();
        true
    }

    /// Enter button. The layout is left empty when the keyboard list has
    /// not caught up with the selected locale, so the host picks one.
    pub(crate) fn launch(&mut self, state: &PodState, ctx: &mut PodContext<'_>) {
        if self.enter_disabled || state.controls_disabled {
            return;
        }
        self.enter_disabled = true;
        let keyboard_layout = if self.loaded_locale.as_deref() == Some(self.selected_locale.as_str())
        {
            self.selected_layout.clone()
        } else {
            String::new()
        };
        ctx.send(HostCommand::LaunchPublicSession {
            username: state.username().to_string(),
            locale: self.selected_locale.clone(),
            keyboard_layout,
        });
    }

    pub(crate) fn learn_more(ctx: &mut PodContext<'_>) {
        ctx.send(HostCommand::LaunchHelpApp {
            topic: HELP_TOPIC_PUBLIC_SESSION,
        });
    }
}

impl PodBehavior for PublicSessionPod {
    fn kind(&self) -> PodKind {
        PodKind::PublicSession
    }

    fn main_input(&self, _state: &PodState) -> PodElement {
        Self::main_input_for(self.expanded)
    }

    fn activate(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        _modifiers: Modifiers,
    ) -> bool {
        if !self.expanded {
            self.set_expanded(state, ctx, true);
            let main = state.focus_input(PodElement::EnterButton);
            ctx.request(RowRequest::Focus(main));
        }
        true
    }

    fn render(&self, state: &PodState, strings: &dyn Localizer) -> PodView {
        let mut view = user::render_base(state, strings);
        view.user_type_icon = user::user_type_icon(state);
        view.action_box = None;
        view.public_info = state.user().map(|u| {
            strings.get_string_f("publicAccountInfoFormat", &[&u.enterprise_domain])
        });
        view
    }

    fn element_visible(&self, state: &PodState, element: PodElement) -> bool {
        match element {
            PodElement::PasswordInput | PodElement::PasswordLabel | PodElement::ReauthWarning => {
                false
            },
            PodElement::LearnMore => true,
            PodElement::EnterButton => self.expanded,
            PodElement::LanguageAndInput => self.expanded && !self.advanced,
            PodElement::LanguageSelect | PodElement::KeyboardSelect => {
                self.expanded && self.advanced
            },
            other => user::element_visible(state, other),
        }
    }

    fn reset(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        take_focus: bool,
    ) -> Option<PodElement> {
        if !take_focus {
            self.set_expanded(state, ctx, false);
        }
        self.enter_disabled = false;
        user::reset(state, Self::main_input_for(self.expanded), take_focus)
    }

    fn next_deadline(&self) -> Option<u64> {
        earliest([
            self.expand_wait.deadline(),
            self.advanced_tick.deadline(),
            self.advanced_wait.deadline(),
        ])
    }

    fn fire_due(&mut self, state: &mut PodState, ctx: &mut PodContext<'_>) {
        if self.advanced_tick.take_due(ctx.now).is_some() {
            self.advanced = true;
            self.make_space(state, ctx);
            self.advanced_wait.start(ctx.now, ctx.timing.advanced_transition_ms);
        }
        if self.expand_wait.poll(ctx.now).is_some() {
            self.finish_expand(ctx);
        }
        if self.advanced_wait.poll(ctx.now).is_some() {
            self.finish_advanced(ctx);
        }
    }

    fn transition_end(&mut self, _state: &mut PodState, ctx: &mut PodContext<'_>) -> bool {
        if self.expand_wait.signal().is_some() {
            self.finish_expand(ctx);
            true
        } else if self.advanced_wait.signal().is_some() {
            self.finish_advanced(ctx);
            true
        } else {
            false
        }
    }
}
