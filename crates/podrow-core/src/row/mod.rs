//! The pod row: the collection of pods and everything that coordinates them.
//!
//! The implementation is split by concern:
//! - this file: construction, accessors, the inbound host API and rebuilds
//! - [`focus`]: the focus/activation state machine and tab order
//! - [`input`]: keyboard and pointer dispatch
//! - [`update`]: the virtual clock, layout passes and show/hide hooks

mod focus;
mod input;
mod update;

use serde::Serialize;

use podrow_types::{
    AppRecord, AuthType, CustomIconSpec, EventTarget, HostCommand, HostSink, KeyboardLayoutEntry,
    LocaleEntry, Localizer, Modifiers, PodRowConfig, PodRowError, Result, UserRecord,
};
use podrow_ui::{
    Attachment, Bubble, BubbleAnchor, CustomIcon, GridShape, GuardedTransition, IconAction,
    IconEnv, LayoutEngine, OneShot, TabOrder,
};

use crate::pod::{Pod, PodContext, PodKind, PodRecord, PodState, PublicSessionPod, RowRequest};

/// Viewport assumed until the host reports a real one.
const DEFAULT_VIEWPORT: (u32, u32) = (1280, 800);

/// Scrollable area the row sits in, for keeping the focused pod on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisibleArea {
    pub scroll_top: u32,
    pub client_height: u32,
    /// Offset of the row inside the scrolled content.
    pub offset_top: u32,
}

/// Pending "launch in diagnostic mode?" confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticPrompt {
    pub app_id: String,
    pub message: String,
    pub ok_label: String,
    pub cancel_label: String,
}

/// Serializable summary of the row, for debugging and the script driver.
#[derive(Debug, Clone, Serialize)]
pub struct RowSnapshot {
    pub now: u64,
    pub columns: u32,
    pub rows: u32,
    pub focused: Option<usize>,
    pub activated: Option<usize>,
    pub disabled: bool,
    pub bubble: Option<String>,
    pub pods: Vec<PodSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodSnapshot {
    pub id: String,
    pub kind: &'static str,
    pub focused: bool,
    pub hidden: bool,
    pub left: u32,
    pub top: u32,
    pub auth_type: &'static str,
    pub icon: Option<IconSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconSnapshot {
    pub hover: String,
    pub autoshow: String,
    pub tooltip: String,
    pub shown: bool,
}

/// The account picker pod row.
pub struct PodRow<H: HostSink> {
    config: PodRowConfig,
    layout: LayoutEngine,
    host: H,
    strings: Box<dyn Localizer>,

    pods: Vec<Pod>,
    users: Vec<UserRecord>,
    apps: Vec<AppRecord>,
    should_show_apps: bool,

    focused: Option<usize>,
    activated: Option<usize>,
    last_focused: Option<usize>,
    /// Set while `focus_pod` runs; nested calls are dropped. Focus events
    /// raised from inside it reach `handle_focus` after `focused` already
    /// names the new pod, so they never ask for another change.
    inside_focus_pod: bool,
    keyboard_activated: bool,
    first_shown: bool,
    /// Element holding keyboard focus.
    active: Option<EventTarget>,
    disabled: bool,
    touch_view: bool,

    shape: GridShape,
    viewport: (u32, u32),
    banner_visible: bool,
    account_picker_active: bool,
    visible: bool,
    placement_postponed: bool,
    header_bar_tab: i32,
    visible_area: Option<VisibleArea>,
    preselect_index: Option<usize>,

    pending_images: Vec<String>,
    images_loading: bool,
    images_timer: OneShot<()>,
    flying_pods: bool,
    flying_timer: OneShot<()>,
    kiosk_error_timer: OneShot<()>,
    after_show: GuardedTransition,
    after_show_pod: Option<usize>,
    screen_ready: bool,

    bubble: Bubble,
    diagnostic_prompt: Option<DiagnosticPrompt>,
    next_salt: u64,
    now: u64,
}

impl<H: HostSink> PodRow<H> {
    pub fn new(config: PodRowConfig, host: H, strings: Box<dyn Localizer>) -> Self {
        let layout = LayoutEngine::new(config.layout.clone(), config.display.is_desktop());
        Self {
            config,
            layout,
            host,
            strings,
            pods: Vec::new(),
            users: Vec::new(),
            apps: Vec::new(),
            should_show_apps: true,
            focused: None,
            activated: None,
            last_focused: None,
            inside_focus_pod: false,
            keyboard_activated: false,
            first_shown: true,
            active: None,
            disabled: false,
            touch_view: false,
            shape: GridShape {
                columns: 1,
                rows: 1,
            },
            viewport: DEFAULT_VIEWPORT,
            banner_visible: false,
            account_picker_active: true,
            visible: true,
            placement_postponed: false,
            header_bar_tab: TabOrder::DOCUMENT,
            visible_area: None,
            preselect_index: None,
            pending_images: Vec::new(),
            images_loading: false,
            images_timer: OneShot::new(),
            flying_pods: false,
            flying_timer: OneShot::new(),
            kiosk_error_timer: OneShot::new(),
            after_show: GuardedTransition::new(),
            after_show_pod: None,
            screen_ready: false,
            bubble: Bubble::new(),
            diagnostic_prompt: None,
            next_salt: 0,
            now: 0,
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn config(&self) -> &PodRowConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn pods(&self) -> &[Pod] {
        &self.pods
    }

    pub fn pod(&self, index: usize) -> Option<&Pod> {
        self.pods.get(index)
    }

    pub fn len(&self) -> usize {
        self.pods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pods.is_empty()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_pod(&self) -> Option<&Pod> {
        self.focused.and_then(|i| self.pods.get(i))
    }

    /// Pod of the login attempt in flight.
    pub fn activated_index(&self) -> Option<usize> {
        self.activated
    }

    pub fn last_focused_index(&self) -> Option<usize> {
        self.last_focused
    }

    pub fn active_element(&self) -> Option<EventTarget> {
        self.active
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_touch_view(&self) -> bool {
        self.touch_view
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Size the hosting screen should take for the current grid.
    pub fn preferred_size(&self) -> (u32, u32) {
        self.layout.preferred_size(self.shape)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn bubble(&self) -> &Bubble {
        &self.bubble
    }

    pub fn is_images_loading(&self) -> bool {
        self.images_loading
    }

    pub fn flying_pods(&self) -> bool {
        self.flying_pods
    }

    pub fn header_bar_tab_index(&self) -> i32 {
        self.header_bar_tab
    }

    pub fn is_placement_postponed(&self) -> bool {
        self.placement_postponed
    }

    /// The screen finished its show animation.
    pub fn is_screen_ready(&self) -> bool {
        self.screen_ready
    }

    pub fn is_first_shown(&self) -> bool {
        self.first_shown
    }

    pub fn keyboard_activated(&self) -> bool {
        self.keyboard_activated
    }

    pub fn diagnostic_prompt(&self) -> Option<&DiagnosticPrompt> {
        self.diagnostic_prompt.as_ref()
    }

    pub fn visible_area(&self) -> Option<VisibleArea> {
        self.visible_area
    }

    pub fn now(&self) -> u64 {
        self.now
    }

    /// Index of the pod for `username`. Kiosk apps have no username.
    pub fn index_of(&self, username: &str) -> Option<usize> {
        self.pods
            .iter()
            .position(|p| p.username() == Some(username))
    }

    fn index_of_app(&self, app_id: &str) -> Option<usize> {
        self.pods
            .iter()
            .position(|p| p.is_app() && p.id() == app_id)
    }

    /// Look a pod up for an inbound call, logging when it is missing.
    fn find_user(&self, username: &str, what: &str) -> Result<usize> {
        self.index_of(username).ok_or_else(|| {
            log::error!("Unable to {what}: user pod not found.");
            PodRowError::PodNotFound(username.to_string())
        })
    }

    /// Serializable summary of the current state.
    pub fn snapshot(&self) -> RowSnapshot {
        RowSnapshot {
            now: self.now,
            columns: self.shape.columns,
            rows: self.shape.rows,
            focused: self.focused,
            activated: self.activated,
            disabled: self.disabled,
            bubble: self.bubble.content().map(str::to_string),
            pods: self
                .pods
                .iter()
                .map(|p| PodSnapshot {
                    id: p.id().to_string(),
                    kind: match p.kind() {
                        PodKind::User => "user",
                        PodKind::PublicSession => "public-session",
                        PodKind::Desktop => "desktop",
                        PodKind::KioskApp => "kiosk-app",
                    },
                    focused: p.is_focused(),
                    hidden: p.is_hidden(),
                    left: p.position().left,
                    top: p.position().top,
                    auth_type: p.auth_type().name(),
                    icon: p.custom_icon().filter(|i| i.is_visible()).map(|i| IconSnapshot {
                        hover: format!("{:?}", i.hover_state()),
                        autoshow: format!("{:?}", i.autoshow_state()),
                        tooltip: i.tooltip_text().to_string(),
                        shown: i.tooltip_shown(&self.bubble),
                    }),
                })
                .collect(),
        }
    }

    // -- plumbing ----------------------------------------------------------

    /// Split the row into its pods and a context the pods can act through.
    fn split(&mut self) -> (&mut Vec<Pod>, PodContext<'_>) {
        let row_width = self.viewport.0;
        (
            &mut self.pods,
            PodContext {
                host: &mut self.host,
                strings: self.strings.as_ref(),
                layout: &self.layout,
                timing: &self.config.timing,
                now: self.now,
                row_width,
                requests: Vec::new(),
            },
        )
    }

    /// Run `f` against one pod, then carry out whatever it asked the row
    /// to do.
    fn with_pod<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Pod, &mut PodContext<'_>) -> R,
    ) -> Option<R> {
        let (pods, mut ctx) = self.split();
        let pod = pods.get_mut(index)?;
        let out = f(pod, &mut ctx);
        let requests = ctx.requests;
        self.apply_requests(index, requests);
        Some(out)
    }

    /// Run `f` against a pod's public session state.
    fn with_public_session<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut PublicSessionPod, &mut PodState, &mut PodContext<'_>) -> R,
    ) -> Option<R> {
        self.with_pod(index, |pod, ctx| {
            pod.public_session_mut()
                .map(|(public, state)| f(public, state, ctx))
        })
        .flatten()
    }

    fn apply_requests(&mut self, index: usize, requests: Vec<RowRequest>) {
        for request in requests {
            match request {
                RowRequest::ShowSigninUi { email } => self.show_signin_ui(&email),
                RowRequest::ShowSupervisedWarning => self.show_supervised_warning(index),
                RowRequest::Focus(element) => self.focus(EventTarget::element(index, element)),
                RowRequest::RefocusActive => {
                    if let Some(target) = self.active {
                        self.handle_focus(target);
                    }
                },
                RowRequest::ConfirmDiagnosticMode { app_id, label } => {
                    self.diagnostic_prompt = Some(DiagnosticPrompt {
                        app_id,
                        message: self
                            .strings
                            .get_string_f("confirmKioskAppDiagnosticModeFormat", &[&label]),
                        ok_label: self.strings.get_string("confirmKioskAppDiagnosticModeYes"),
                        cancel_label: self.strings.get_string("confirmKioskAppDiagnosticModeNo"),
                    });
                },
            }
        }
    }

    /// Run `f` against a pod's custom icon, if it has one.
    fn with_icon<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut CustomIcon, &mut IconEnv<'_>) -> R,
    ) -> Option<R> {
        let pod_focused = self.visible && self.focused == Some(index);
        let icon = self.pods.get_mut(index)?.state.custom_icon.as_mut()?;
        let mut env = IconEnv {
            bubble: &mut self.bubble,
            now: self.now,
            pod_focused,
        };
        Some(f(icon, &mut env))
    }

    fn send(&mut self, command: HostCommand) {
        log::debug!("Host command {}", command.name());
        self.host.send(command);
    }

    /// Drop error bubbles left over from an earlier attempt.
    fn clear_errors(&mut self) {
        self.bubble.hide();
        self.send(HostCommand::ClearErrors);
    }

    fn show_supervised_warning(&mut self, index: usize) {
        self.focus_pod(Some(index), false);
        let Some(username) = self.pods.get(index).map(|p| p.id().to_string()) else {
            return;
        };
        let text = self.strings.get_string("supervisedUserExpiredTokenWarning");
        self.bubble
            .show_for(BubbleAnchor::Pod(username), &text, Attachment::Top);
    }

    fn run_icon_action(&mut self, index: usize, action: IconAction) {
        let Some(username) = self.pods.get(index).map(|p| p.id().to_string()) else {
            return;
        };
        match action {
            IconAction::Hardlock => self.send(HostCommand::HardlockPod { username }),
            IconAction::TrialRunClick => self.send(HostCommand::RecordClickOnLockIcon { username }),
        }
    }

    // -- inbound host API --------------------------------------------------

    /// Replace the user list and rebuild every pod.
    pub fn load_pods(&mut self, users: Vec<UserRecord>) {
        log::info!("Loading {} user pods", users.len());
        self.users = users;
        self.rebuild_pods();
    }

    /// Replace the kiosk app list.
    pub fn set_apps(&mut self, apps: Vec<AppRecord>) {
        self.apps = apps;
        self.rebuild_pods();
        self.send(HostCommand::KioskAppsLoaded);
        self.kiosk_error_timer
            .schedule(self.now, self.config.timing.kiosk_error_check_ms, ());
    }

    pub fn set_should_show_apps(&mut self, show: bool) {
        if self.should_show_apps == show {
            return;
        }
        self.should_show_apps = show;
        self.rebuild_pods();
    }

    /// Throw away every pod and build new ones from the stored records.
    pub fn rebuild_pods(&mut self) {
        self.pods.clear();
        self.focused = None;
        self.activated = None;
        self.last_focused = None;
        self.active = None;
        self.after_show.cancel();
        self.after_show_pod = None;
        self.bubble.hide();

        // New pods have no previous position to animate from.
        self.flying_pods = false;
        self.flying_timer.cancel();

        let display = self.config.display;
        let users = self.users.clone();
        let apps = if self.should_show_apps {
            self.apps.clone()
        } else {
            Vec::new()
        };
        let (pods, mut ctx) = self.split();
        for user in users {
            pods.push(Pod::for_user(user, display, &mut ctx));
        }
        let user_pods = pods.len();
        for app in apps {
            pods.push(Pod::for_app(app, display, &mut ctx));
        }
        if !ctx.requests.is_empty() {
            log::debug!("Ignoring {} requests from pod construction", ctx.requests.len());
        }

        self.pending_images = self.pods[..user_pods]
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        self.images_loading = !self.pending_images.is_empty();
        self.images_timer
            .schedule(self.now, self.config.timing.images_load_timeout_ms, ());

        if self.account_picker_active {
            self.place_pods();
            self.maybe_preselect_pod();
            self.flying_timer.schedule(self.now, 0, ());
        } else {
            self.placement_postponed = true;
        }
    }

    pub fn set_auth_type(
        &mut self,
        username: &str,
        auth_type: AuthType,
        value: Option<String>,
    ) -> Result<()> {
        let index = self.find_user(username, "set auth type")?;
        let focused = self.focused == Some(index);
        let element = self
            .with_pod(index, |pod, ctx| pod.set_auth_type(auth_type, value, ctx, focused))
            .flatten();
        if let Some(element) = element {
            self.focus(EventTarget::element(index, element));
        }
        Ok(())
    }

    /// Show (or update) the custom icon next to a pod's input.
    pub fn show_user_pod_custom_icon(&mut self, username: &str, spec: CustomIconSpec) -> Result<()> {
        let index = self.find_user(username, "show user pod button")?;
        if spec.id.is_none() && spec.tooltip.is_none() {
            return Ok(());
        }

        let timing = self.config.timing.clone();
        let pod = &mut self.pods[index];
        let icon = pod
            .state
            .custom_icon
            .get_or_insert_with(|| CustomIcon::new(username, &timing));
        if spec.id.is_some() {
            icon.set_icon(spec.id);
        }
        let action = if spec.is_trial_run {
            Some(IconAction::TrialRunClick)
        } else if spec.hardlock_on_click {
            Some(IconAction::Hardlock)
        } else {
            None
        };
        icon.set_interactive(action);

        let aria_label = spec
            .aria_label
            .clone()
            .or_else(|| spec.tooltip.as_ref().map(|t| t.text.clone()))
            .filter(|label| !label.is_empty());
        match aria_label {
            Some(label) => icon.set_aria_label(&label),
            None => log::warn!("No ARIA label for user pod custom icon."),
        }
        icon.show();

        // After `show` so an autoshow tooltip can appear right away.
        let tooltip = spec.tooltip.unwrap_or_default();
        self.with_icon(index, |icon, env| {
            icon.set_tooltip(env, &tooltip.text, tooltip.autoshow)
        });
        Ok(())
    }

    pub fn hide_user_pod_custom_icon(&mut self, username: &str) -> Result<()> {
        let index = self.find_user(username, "hide user pod button")?;
        self.with_icon(index, |icon, env| icon.hide(env));
        Ok(())
    }

    pub fn set_public_session_display_name(&mut self, username: &str, name: &str) -> Result<()> {
        let index = self.find_user(username, "set public session display name")?;
        let pod = &mut self.pods[index];
        if let PodRecord::User(user) = &mut pod.state.record {
            user.display_name = name.to_string();
        }
        pod.update(self.strings.as_ref());
        Ok(())
    }

    pub fn set_public_session_locales(
        &mut self,
        username: &str,
        locales: Vec<LocaleEntry>,
        default_locale: &str,
        multiple_recommended: bool,
    ) -> Result<()> {
        let index = self.find_user(username, "set public session locales")?;
        self.with_public_session(index, |public, state, ctx| {
            public.populate_language_select(state, ctx, locales, default_locale, multiple_recommended)
        });
        Ok(())
    }

    pub fn set_public_session_keyboard_layouts(
        &mut self,
        username: &str,
        locale: &str,
        layouts: Vec<KeyboardLayoutEntry>,
    ) -> Result<()> {
        let index = self.find_user(username, "set public session keyboard layouts")?;
        self.with_public_session(index, |public, _, _| {
            public.populate_keyboard_select(locale, layouts)
        });
        Ok(())
    }

    /// The user picked a language in an expanded public session pod.
    pub fn select_public_session_locale(&mut self, username: &str, locale: &str) -> Result<()> {
        let index = self.find_user(username, "select public session locale")?;
        let accepted = self
            .with_public_session(index, |public, state, ctx| {
                public.select_language(state, ctx, locale)
            })
            .unwrap_or(false);
        if accepted {
            Ok(())
        } else {
            Err(PodRowError::InputRejected(format!("locale {locale}")))
        }
    }

    pub fn select_public_session_keyboard_layout(
        &mut self,
        username: &str,
        layout: &str,
    ) -> Result<()> {
        let index = self.find_user(username, "select public session keyboard layout")?;
        let accepted = self
            .with_public_session(index, |public, _, _| public.select_keyboard_layout(layout))
            .unwrap_or(false);
        if accepted {
            Ok(())
        } else {
            Err(PodRowError::InputRejected(format!("keyboard layout {layout}")))
        }
    }

    pub fn remove_user_pod(&mut self, username: &str) -> Result<()> {
        let Some(index) = self.index_of(username) else {
            log::warn!("Attempt to remove not existing pod for {username}.");
            return Err(PodRowError::PodNotFound(username.to_string()));
        };
        self.pods.remove(index);
        let shift = |slot: Option<usize>| match slot {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
        self.focused = shift(self.focused);
        self.activated = shift(self.activated);
        self.last_focused = shift(self.last_focused);
        self.after_show_pod = shift(self.after_show_pod);
        self.active = match self.active {
            Some(EventTarget::Pod { index: i, element }) => {
                shift(Some(i)).map(|i| EventTarget::element(i, element))
            },
            other => other,
        };
        self.pending_images.retain(|id| id != username);
        if !self.pods.is_empty() {
            self.place_pods();
        }
        Ok(())
    }

    /// Bust the cached avatar of a user.
    pub fn update_user_image(&mut self, username: &str) -> Result<()> {
        let index = self.find_user(username, "update user image")?;
        self.next_salt += 1;
        let salt = self.next_salt;
        self.pods[index].update_user_image(salt, self.strings.as_ref());
        Ok(())
    }

    /// Touch view keeps the action box button drawn and disables the
    /// single-pod focus lock.
    pub fn set_touch_view(&mut self, enabled: bool) {
        self.touch_view = enabled;
        for pod in &mut self.pods {
            pod.state.menu.forced = enabled;
        }
    }

    /// Disable every button and input of the row.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        for pod in &mut self.pods {
            pod.state.controls_disabled = disabled;
            pod.state.password.disabled = disabled;
        }
    }

    pub fn set_banner_visible(&mut self, visible: bool) {
        self.banner_visible = visible;
    }

    /// Whether the sign-in UI currently shows the account picker. Rebuilds
    /// while it does not postpone pod placement until the next show.
    pub fn set_account_picker_active(&mut self, active: bool) {
        self.account_picker_active = active;
    }

    /// Desktop only: index of the pod to focus initially.
    pub fn set_preselect_index(&mut self, index: Option<usize>) {
        self.preselect_index = index;
    }

    pub fn set_visible_area(&mut self, area: Option<VisibleArea>) {
        self.visible_area = area;
    }

    /// The renderer measured a pod; mismatches are reported on the next
    /// layout pass.
    pub fn report_pod_size(&mut self, index: usize, width: u32, height: u32) {
        if let Some(pod) = self.pods.get_mut(index) {
            pod.state.measured_size = Some((width, height));
        }
    }

    /// The user confirmed launching the kiosk app in diagnostic mode.
    pub fn confirm_diagnostic_mode(&mut self) {
        if let Some(prompt) = self.diagnostic_prompt.take() {
            self.send(HostCommand::LaunchKioskApp {
                app_id: prompt.app_id,
                diagnostic_mode: true,
            });
        }
    }

    pub fn cancel_diagnostic_mode(&mut self) {
        self.diagnostic_prompt = None;
    }

    /// Launch a kiosk app as if its pod was clicked.
    pub fn run_app(&mut self, app_id: &str, diagnostic_mode: bool) -> Result<()> {
        let index = self.index_of_app(app_id).ok_or_else(|| {
            log::error!("Unable to run app: app pod not found.");
            PodRowError::PodNotFound(app_id.to_string())
        })?;
        let modifiers = Modifiers {
            ctrl: diagnostic_mode,
            ..Modifiers::default()
        };
        self.click(EventTarget::pod(index), modifiers);
        Ok(())
    }

    /// Focus the pod and open the online sign-in flow for `email`.
    pub fn show_signin_ui(&mut self, email: &str) {
        self.clear_errors();
        self.set_disabled(true);
        self.last_focused = self.index_of(email);
        self.send(HostCommand::ShowSigninUi {
            email: email.to_string(),
        });
    }

    /// Ask the host to reload the wallpaper of the last focused user.
    pub fn load_last_wallpaper(&mut self) {
        let Some(pod) = self.last_focused.and_then(|i| self.pods.get(i)) else {
            return;
        };
        if pod.is_app() {
            return;
        }
        let username = pod.id().to_string();
        self.send(HostCommand::LoadWallpaper { username });
    }
}

#[cfg(test)]
mod tests;
