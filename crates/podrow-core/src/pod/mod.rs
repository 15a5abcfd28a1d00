//! Pods: one selectable tile per user account, public session or kiosk app.
//!
//! Every pod shares [`PodState`]; what differs between variants (what
//! activation does, which element is the main input, what gets rendered)
//! lives behind [`PodBehavior`], implemented once per variant.

mod desktop;
mod kiosk;
mod public_session;
mod user;

pub use desktop::DesktopPod;
pub use kiosk::KioskAppPod;
pub use public_session::PublicSessionPod;
pub use user::UserPod;

use podrow_types::{
    AppRecord, AuthType, DisplayType, HostCommand, HostSink, Localizer, Modifiers, PodElement,
    TimingConfig, UserRecord,
};
use podrow_ui::{CustomIcon, InputField, LayoutEngine, PodPosition, TabOrder, TabStops};

/// Which variant a pod is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodKind {
    User,
    PublicSession,
    Desktop,
    KioskApp,
}

/// The record a pod was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodRecord {
    User(UserRecord),
    App(AppRecord),
}

/// Work a pod hands back to the row because it needs row-level state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowRequest {
    /// Open the online sign-in flow for `email`.
    ShowSigninUi { email: String },
    /// Focus the pod and warn that the supervised user's token expired.
    ShowSupervisedWarning,
    /// Move keyboard focus to an element of this pod.
    Focus(PodElement),
    /// Re-dispatch focus on the active element after an animation.
    RefocusActive,
    /// Ask before launching a kiosk app in diagnostic mode.
    ConfirmDiagnosticMode { app_id: String, label: String },
}

/// What a pod may touch while handling an event.
pub struct PodContext<'a> {
    pub host: &'a mut dyn HostSink,
    pub strings: &'a dyn Localizer,
    pub layout: &'a LayoutEngine,
    pub timing: &'a TimingConfig,
    pub now: u64,
    /// Current width of the whole row, for expanded public session pods.
    pub row_width: u32,
    pub requests: Vec<RowRequest>,
}

impl PodContext<'_> {
    pub fn send(&mut self, command: HostCommand) {
        log::debug!("Host command {}", command.name());
        self.host.send(command);
    }

    pub fn request(&mut self, request: RowRequest) {
        self.requests.push(request);
    }
}

/// Small icon describing the kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTypeIcon {
    Child,
    LegacySupervised,
    /// Restricted by multi-profile policy.
    Policy,
    App,
}

/// The action box menu as drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionBoxView {
    pub aria_label: String,
    pub title_name: String,
    /// Hidden for legacy supervised users.
    pub title_email: Option<String>,
    pub remove_aria_label: String,
    pub remove_label: String,
    pub remove_hidden: bool,
}

/// Everything a renderer needs to draw a pod. All text is localized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PodView {
    pub image_url: String,
    pub name: String,
    pub signed_in: bool,
    pub auth_type: &'static str,
    pub password_aria_label: String,
    pub password_hidden: bool,
    /// Shown instead of the password field for user-click auth.
    pub password_label: Option<String>,
    pub launch_button_label: Option<String>,
    /// `None` when the pod has no action box.
    pub action_box: Option<ActionBoxView>,
    pub user_type_icon: Option<UserTypeIcon>,
    pub policy_message: Option<String>,
    pub public_info: Option<String>,
    pub remove_warning_text: Option<String>,
}

/// Action box menu flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionMenu {
    pub active: bool,
    pub hovered: bool,
    pub remove_hidden: bool,
    pub warning_shown: bool,
    pub moved_up: bool,
    /// Always drawn, in touch view.
    pub forced: bool,
}

/// State shared by every pod variant.
#[derive(Debug, Clone)]
pub struct PodState {
    pub(crate) record: PodRecord,
    pub(crate) auth_type: AuthType,
    pub(crate) auth_value: Option<String>,
    pub(crate) password: InputField,
    pub(crate) tabs: TabStops<PodElement>,
    pub(crate) policy_applied: bool,
    pub(crate) focused: bool,
    pub(crate) hidden: bool,
    pub(crate) faded: bool,
    pub(crate) signing_in: bool,
    pub(crate) user_click_auth_allowed: bool,
    pub(crate) controls_disabled: bool,
    pub(crate) menu: ActionMenu,
    pub(crate) policy_bubble_shown: bool,
    pub(crate) position: PodPosition,
    pub(crate) measured_size: Option<(u32, u32)>,
    pub(crate) custom_icon: Option<CustomIcon>,
    pub(crate) image_salt: u64,
    pub(crate) view: PodView,
}

impl PodState {
    fn new(record: PodRecord, display: DisplayType) -> Self {
        let policy_applied = match &record {
            PodRecord::User(u) => display == DisplayType::UserAdding && !u.is_multi_profiles_allowed,
            PodRecord::App(_) => false,
        };
        let mut tabs = TabStops::new();
        tabs.set(PodElement::Pod, TabOrder::POD_INPUT);
        tabs.set(PodElement::ActionBoxArea, TabOrder::ACTION_BOX);
        Self {
            record,
            auth_type: AuthType::OfflinePassword,
            auth_value: None,
            password: InputField::password(),
            tabs,
            policy_applied,
            focused: false,
            hidden: false,
            faded: false,
            signing_in: false,
            user_click_auth_allowed: false,
            controls_disabled: false,
            menu: ActionMenu::default(),
            policy_bubble_shown: false,
            position: PodPosition::default(),
            measured_size: None,
            custom_icon: None,
            image_salt: 0,
            view: PodView::default(),
        }
    }

    pub(crate) fn user(&self) -> Option<&UserRecord> {
        match &self.record {
            PodRecord::User(u) => Some(u),
            PodRecord::App(_) => None,
        }
    }

    pub(crate) fn username(&self) -> &str {
        match &self.record {
            PodRecord::User(u) => &u.username,
            PodRecord::App(a) => &a.id,
        }
    }

    /// Hand tab index 1 from the pod to its main input.
    pub(crate) fn focus_input(&mut self, main: PodElement) -> PodElement {
        self.tabs.set(PodElement::Pod, TabOrder::UNREACHABLE);
        self.tabs.set(main, TabOrder::POD_INPUT);
        main
    }

    /// Give tab index 1 back to the pod. The main input may be the pod
    /// itself, so the pod is set last.
    pub(crate) fn reset_tab_order(&mut self, main: PodElement) {
        self.tabs.set(main, TabOrder::UNREACHABLE);
        self.tabs.set(PodElement::Pod, TabOrder::POD_INPUT);
    }
}

/// Per-variant behaviour.
pub(crate) trait PodBehavior {
    fn kind(&self) -> PodKind;

    /// Element that receives focus when the pod is focused.
    fn main_input(&self, state: &PodState) -> PodElement;

    /// Run the primary action. Returns whether an attempt was actually
    /// issued; `false` leaves the pod unchanged.
    fn activate(
        &mut self,
        state: &mut PodState,
        ctx: &mut PodContext<'_>,
        modifiers: Modifiers,
    ) -> bool;

    fn render(&self, state: &PodState, strings: &dyn Localizer) -> PodView;

    fn element_visible(&self, state: &PodState, element: PodElement) -> bool {
        user::element_visible(state, element)
    }

    /// Clear input and either take focus or restore the resting tab order.
    /// Returns the element to focus, if any.
    fn reset(
        &mut self,
        state: &mut PodState,
        _ctx: &mut PodContext<'_>,
        take_focus: bool,
    ) -> Option<PodElement> {
        let main = self.main_input(state);
        user::reset(state, main, take_focus)
    }

    fn next_deadline(&self) -> Option<u64> {
        None
    }

    fn fire_due(&mut self, _state: &mut PodState, _ctx: &mut PodContext<'_>) {}

    /// A transition-end signal from the renderer. Returns true if a wait
    /// consumed it.
    fn transition_end(&mut self, _state: &mut PodState, _ctx: &mut PodContext<'_>) -> bool {
        false
    }
}

/// Tagged union of the pod variants.
#[derive(Debug, Clone)]
pub enum PodVariant {
    User(UserPod),
    PublicSession(PublicSessionPod),
    Desktop(DesktopPod),
    KioskApp(KioskAppPod),
}

impl PodVariant {
    fn behavior(&self) -> &dyn PodBehavior {
        match self {
            PodVariant::User(p) => p,
            PodVariant::PublicSession(p) => p,
            PodVariant::Desktop(p) => p,
            PodVariant::KioskApp(p) => p,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn PodBehavior {
        match self {
            PodVariant::User(p) => p,
            PodVariant::PublicSession(p) => p,
            PodVariant::Desktop(p) => p,
            PodVariant::KioskApp(p) => p,
        }
    }
}

/// One tile of the pod row.
#[derive(Debug, Clone)]
pub struct Pod {
    pub(crate) state: PodState,
    pub(crate) variant: PodVariant,
}

impl Pod {
    /// Build a user pod; desktop profiles and public sessions get their own
    /// variants.
    pub(crate) fn for_user(
        user: UserRecord,
        display: DisplayType,
        ctx: &mut PodContext<'_>,
    ) -> Self {
        let variant = if user.is_desktop_user {
            PodVariant::Desktop(DesktopPod)
        } else if user.public_account {
            PodVariant::PublicSession(PublicSessionPod::new())
        } else {
            PodVariant::User(UserPod)
        };
        let mut pod = Self {
            state: PodState::new(PodRecord::User(user), display),
            variant,
        };
        pod.initialize(ctx);
        pod
    }

    pub(crate) fn for_app(app: AppRecord, display: DisplayType, ctx: &mut PodContext<'_>) -> Self {
        let mut pod = Self {
            state: PodState::new(PodRecord::App(app), display),
            variant: PodVariant::KioskApp(KioskAppPod),
        };
        pod.initialize(ctx);
        pod
    }

    fn initialize(&mut self, ctx: &mut PodContext<'_>) {
        let initial = self
            .state
            .user()
            .and_then(|u| u.initial_auth_type)
            .unwrap_or_default();
        self.set_auth_type(initial, None, ctx, false);
        self.state.user_click_auth_allowed = false;
        if let PodVariant::PublicSession(p) = &mut self.variant {
            p.initialize(&mut self.state, ctx);
        }
    }

    pub fn kind(&self) -> PodKind {
        self.variant.behavior().kind()
    }

    /// Username for user pods, app id for kiosk apps.
    pub fn id(&self) -> &str {
        self.state.username()
    }

    /// Username, for pods that stand for a user account.
    pub fn username(&self) -> Option<&str> {
        self.state.user().map(|u| u.username.as_str())
    }

    pub fn record(&self) -> &PodRecord {
        &self.state.record
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.state.user()
    }

    pub fn is_app(&self) -> bool {
        matches!(self.state.record, PodRecord::App(_))
    }

    pub fn is_desktop_user(&self) -> bool {
        self.user().is_some_and(|u| u.is_desktop_user)
    }

    pub fn is_focused(&self) -> bool {
        self.state.focused
    }

    pub fn is_hidden(&self) -> bool {
        self.state.hidden
    }

    pub fn is_faded(&self) -> bool {
        self.state.faded
    }

    pub fn is_signing_in(&self) -> bool {
        self.state.signing_in
    }

    pub fn position(&self) -> PodPosition {
        self.state.position
    }

    pub fn auth_type(&self) -> AuthType {
        self.state.auth_type
    }

    pub fn auth_value(&self) -> Option<&str> {
        self.state.auth_value.as_deref()
    }

    pub fn password(&self) -> &InputField {
        &self.state.password
    }

    pub fn policy_applied(&self) -> bool {
        self.state.policy_applied
    }

    pub fn policy_bubble_shown(&self) -> bool {
        self.state.policy_bubble_shown
    }

    pub fn action_menu(&self) -> ActionMenu {
        self.state.menu
    }

    pub fn custom_icon(&self) -> Option<&CustomIcon> {
        self.state.custom_icon.as_ref()
    }

    pub fn image_salt(&self) -> u64 {
        self.state.image_salt
    }

    pub fn public_session(&self) -> Option<&PublicSessionPod> {
        match &self.variant {
            PodVariant::PublicSession(p) => Some(p),
            _ => None,
        }
    }

    /// The rendered view, refreshed by every update.
    pub fn render(&self) -> &PodView {
        &self.state.view
    }

    pub fn main_input(&self) -> PodElement {
        self.variant.behavior().main_input(&self.state)
    }

    /// Tab index of one of the pod's elements, if it has one.
    pub fn tab_index(&self, element: PodElement) -> Option<i32> {
        if element == PodElement::CustomIcon {
            return self.custom_icon().and_then(|i| i.tab_index());
        }
        self.state.tabs.get(element)
    }

    pub fn element_visible(&self, element: PodElement) -> bool {
        !self.state.hidden && self.variant.behavior().element_visible(&self.state, element)
    }

    /// Tab stops of the visible elements, in document order.
    pub fn tab_stops(&self) -> Vec<(PodElement, i32)> {
        let mut stops: Vec<(PodElement, i32)> = self.state.tabs.iter().collect();
        if let Some(idx) = self.tab_index(PodElement::CustomIcon) {
            stops.push((PodElement::CustomIcon, idx));
            stops.sort_by_key(|(el, _)| *el);
        }
        stops.retain(|(el, _)| self.element_visible(*el));
        stops
    }

    pub(crate) fn activate(&mut self, ctx: &mut PodContext<'_>, modifiers: Modifiers) -> bool {
        let Pod { state, variant } = self;
        variant.behavior_mut().activate(state, ctx, modifiers)
    }

    pub(crate) fn reset(&mut self, ctx: &mut PodContext<'_>, take_focus: bool) -> Option<PodElement> {
        let Pod { state, variant } = self;
        variant.behavior_mut().reset(state, ctx, take_focus)
    }

    pub(crate) fn focus_input(&mut self) -> PodElement {
        let main = self.main_input();
        self.state.focus_input(main)
    }

    /// Re-render from the record and current auth state.
    pub(crate) fn update(&mut self, strings: &dyn Localizer) {
        self.state.view = self.variant.behavior().render(&self.state, strings);
    }

    /// Switch authentication method; the pod re-renders and resets,
    /// keeping focus if it had it.
    pub(crate) fn set_auth_type(
        &mut self,
        auth_type: AuthType,
        value: Option<String>,
        ctx: &mut PodContext<'_>,
        focused: bool,
    ) -> Option<PodElement> {
        self.state.auth_type = auth_type;
        self.state.auth_value = value;
        self.update(ctx.strings);
        self.reset(ctx, focused)
    }

    pub(crate) fn update_user_image(&mut self, salt: u64, strings: &dyn Localizer) {
        self.state.image_salt = salt;
        self.update(strings);
    }

    pub(crate) fn next_deadline(&self) -> Option<u64> {
        self.variant.behavior().next_deadline()
    }

    pub(crate) fn fire_due(&mut self, ctx: &mut PodContext<'_>) {
        let Pod { state, variant } = self;
        variant.behavior_mut().fire_due(state, ctx);
    }

    pub(crate) fn transition_end(&mut self, ctx: &mut PodContext<'_>) -> bool {
        let Pod { state, variant } = self;
        variant.behavior_mut().transition_end(state, ctx)
    }

    pub(crate) fn public_session_mut(&mut self) -> Option<(&mut PublicSessionPod, &mut PodState)> {
        match &mut self.variant {
            PodVariant::PublicSession(p) => Some((p, &mut self.state)),
            _ => None,
        }
    }

    /// Open or close the action box menu. Opening resets the remove
    /// command; the row handles focus.
    pub(crate) fn set_menu_active(&mut self, active: bool) {
        if self.state.menu.active == active {
            return;
        }
        if active {
            let can_remove = self.user().is_some_and(|u| u.can_remove);
            self.state.menu.remove_hidden = !can_remove;
            self.state.menu.warning_shown = false;
            self.state.policy_bubble_shown = false;
            self.state.menu.active = true;
        } else {
            self.state.menu.active = false;
            self.state.menu.moved_up = false;
            self.state.tabs.set(PodElement::RemoveCommand, TabOrder::UNREACHABLE);
        }
    }

    pub(crate) fn set_menu_hovered(&mut self, hovered: bool) {
        if self.state.menu.hovered == hovered {
            return;
        }
        if !hovered && self.state.policy_applied {
            self.state.policy_bubble_shown = false;
        }
        self.state.menu.hovered = hovered;
    }

    /// Replace the remove command with the confirmation warning.
    pub(crate) fn show_remove_warning(&mut self, ctx: &mut PodContext<'_>) -> PodElement {
        self.state.menu.remove_hidden = true;
        self.state.menu.warning_shown = true;
        ctx.send(HostCommand::LogRemoveUserWarningShown);
        PodElement::RemoveWarningButton
    }

    /// Ask the host to remove this pod's user. Desktop profiles are removed
    /// by profile path.
    pub(crate) fn remove_user(&self, ctx: &mut PodContext<'_>) {
        let Some(user) = self.user() else {
            return;
        };
        let id = if user.is_desktop_user {
            user.profile_path.clone()
        } else {
            user.username.clone()
        };
        ctx.send(HostCommand::RemoveUser { id });
    }

    /// Online sign-in on click, for pods that require it.
    pub(crate) fn show_signin_ui(&self, ctx: &mut PodContext<'_>) {
        user::show_signin_ui(&self.state, ctx);
    }

    /// Legacy supervised users and desktop profiles confirm removal first.
    pub(crate) fn remove_needs_warning(&self) -> bool {
        self.user()
            .is_some_and(|u| u.legacy_supervised_user || u.is_desktop_user)
    }
}
