//! Row-level tests: focus, dispatch, timers and the inbound host API.

use super::*;
use podrow_types::{
    DisplayType, IconId, Key, KeyEcho, KeyEvent, KeyboardLayoutEntry, LocaleEntry, PodElement,
    TooltipSpec,
};
use podrow_ui::AutoshowState;

type TestRow = PodRow<Vec<HostCommand>>;

fn users(n: usize) -> Vec<UserRecord> {
    (0..n)
        .map(|i| UserRecord::new(&format!("user{i}@example.com"), &format!("User {i}")))
        .collect()
}

fn row_with(config: PodRowConfig, users: Vec<UserRecord>) -> TestRow {
    let mut row = PodRow::new(config, Vec::new(), Box::new(KeyEcho));
    row.load_pods(users);
    row.host_mut().clear();
    row
}

fn row(n: usize) -> TestRow {
    row_with(PodRowConfig::default(), users(n))
}

fn desktop_config() -> PodRowConfig {
    PodRowConfig {
        display: DisplayType::DesktopUserManager,
        ..PodRowConfig::default()
    }
}

fn desktop_user(name: &str) -> UserRecord {
    let mut user = UserRecord::new(&format!("{name}@example.com"), name);
    user.is_desktop_user = true;
    user.profile_path = format!("/profiles/{name}");
    user
}

fn public_user() -> UserRecord {
    let mut user = UserRecord::new("public@example.com", "Guest");
    user.public_account = true;
    user.enterprise_domain = "example.com".into();
    user.initial_locale = "en-US".into();
    user.initial_locales = vec![
        LocaleEntry {
            value: "en-US".into(),
            title: "English".into(),
            option_group_name: None,
        },
        LocaleEntry {
            value: "de".into(),
            title: "Deutsch".into(),
            option_group_name: None,
        },
    ];
    user
}

fn us_layout() -> Vec<KeyboardLayoutEntry> {
    vec![KeyboardLayoutEntry {
        value: "xkb:us::eng".into(),
        title: "US".into(),
        selected: true,
    }]
}

fn press(row: &mut TestRow, key: Key, target: EventTarget) {
    row.key_down(KeyEvent::new(key, target));
}

fn password(index: usize) -> EventTarget {
    EventTarget::element(index, PodElement::PasswordInput)
}

fn area(index: usize) -> EventTarget {
    EventTarget::element(index, PodElement::ActionBoxArea)
}

fn sent(row: &TestRow, command: &HostCommand) -> bool {
    row.host().contains(command)
}

fn count_focused(row: &TestRow) -> usize {
    row.pods().iter().filter(|p| p.is_focused()).count()
}

// -- preselection ------------------------------------------------------------

#[test]
fn first_pod_is_preselected() {
    let row = row(3);
    assert_eq!(row.focused_index(), Some(0));
    assert_eq!(row.active_element(), Some(password(0)));
    let pod = row.pod(0).unwrap();
    assert_eq!(pod.tab_index(PodElement::PasswordInput), Some(1));
    assert_eq!(pod.tab_index(PodElement::Pod), Some(-1));
    assert_eq!(count_focused(&row), 1);
}

#[test]
fn signed_in_pod_wins_preselection() {
    let mut list = users(3);
    list[2].signed_in = true;
    let row = row_with(PodRowConfig::default(), list);
    assert_eq!(row.focused_index(), Some(2));
}

#[test]
fn policy_restricted_pods_are_skipped() {
    let config = PodRowConfig {
        display: DisplayType::UserAdding,
        ..PodRowConfig::default()
    };
    let mut list = users(2);
    list[0].is_multi_profiles_allowed = false;
    let row = row_with(config, list);
    assert_eq!(row.focused_index(), Some(1));
}

#[test]
fn all_restricted_focuses_first_tile_without_bubble() {
    let config = PodRowConfig {
        display: DisplayType::UserAdding,
        ..PodRowConfig::default()
    };
    let mut list = users(2);
    for user in &mut list {
        user.is_multi_profiles_allowed = false;
    }
    let row = row_with(config, list);
    assert_eq!(row.focused_index(), Some(0));
    assert_eq!(row.active_element(), Some(EventTarget::pod(0)));
    assert!(!row.pod(0).unwrap().policy_bubble_shown());
}

#[test]
fn lone_desktop_pod_is_not_preselected() {
    let row = row_with(desktop_config(), vec![desktop_user("bob")]);
    assert_eq!(row.focused_index(), None);
    assert!(!row.always_focus_single_pod());
}

#[test]
fn desktop_preselect_index_fades_others() {
    let mut row: TestRow = PodRow::new(desktop_config(), Vec::new(), Box::new(KeyEcho));
    row.set_preselect_index(Some(1));
    row.load_pods(vec![desktop_user("bob"), desktop_user("carol")]);
    assert_eq!(row.focused_index(), Some(1));
    assert!(row.pod(0).unwrap().is_faded());
    assert!(!row.pod(1).unwrap().is_faded());
}

#[test]
fn placement_waits_for_the_account_picker() {
    let mut row: TestRow = PodRow::new(PodRowConfig::default(), Vec::new(), Box::new(KeyEcho));
    row.set_account_picker_active(false);
    row.load_pods(users(2));
    assert!(row.is_placement_postponed());
    assert_eq!(row.focused_index(), None);

    row.set_account_picker_active(true);
    row.handle_before_show();
    assert!(!row.is_placement_postponed());
    assert_eq!(row.focused_index(), Some(0));
}

// -- focus_pod ---------------------------------------------------------------

#[test]
fn focus_pod_is_idempotent() {
    let mut row = row(3);
    row.focus_pod(Some(1), false);
    let snapshot = serde_json::to_string(&row.snapshot()).unwrap();
    let commands = row.host().len();

    row.focus_pod(Some(1), false);
    assert_eq!(serde_json::to_string(&row.snapshot()).unwrap(), snapshot);
    assert_eq!(row.host().len(), commands);
}

#[test]
fn focus_change_clears_errors_and_notifies_host() {
    let mut row = row(3);
    row.focus_pod(Some(2), false);
    assert_eq!(
        row.host().as_slice(),
        &[
            HostCommand::ClearErrors,
            HostCommand::FocusPod {
                username: "user2@example.com".into()
            },
        ]
    );
    assert_eq!(row.last_focused_index(), Some(2));
    assert!(!row.is_first_shown());
}

#[test]
fn focus_events_raised_by_a_focus_change_do_not_repeat_it() {
    // focus -> handle_focus -> focus_pod -> focus(main input) -> handle_focus
    let mut row = row(3);
    row.click(password(1), Modifiers::default());
    assert_eq!(row.focused_index(), Some(1));
    assert_eq!(row.active_element(), Some(password(1)));
    assert_eq!(
        row.host().as_slice(),
        &[
            HostCommand::ClearErrors,
            HostCommand::FocusPod {
                username: "user1@example.com".into()
            },
        ]
    );
    assert!(!row.inside_focus_pod);
}

#[test]
fn focus_change_while_one_is_running_is_dropped() {
    // No synchronous path re-enters today; the flag is set by hand.
    let mut row = row(3);
    row.inside_focus_pod = true;
    row.focus_pod(Some(1), false);
    assert_eq!(row.focused_index(), Some(0));
    assert!(row.host().is_empty());
}

#[test]
fn missing_pod_focus_is_ignored() {
    let mut row = row(2);
    row.focus_pod(Some(7), false);
    assert_eq!(row.focused_index(), Some(0));
}

#[test]
fn defocused_pods_give_tab_index_back() {
    let mut row = row(2);
    row.focus_pod(Some(1), false);
    let pod = row.pod(0).unwrap();
    assert_eq!(pod.tab_index(PodElement::Pod), Some(1));
    assert_eq!(pod.tab_index(PodElement::PasswordInput), Some(-1));
    assert!(!pod.is_focused());
}

#[test]
fn scroll_keeps_focused_pod_visible() {
    let mut row = row(7);
    assert_eq!(row.shape(), podrow_ui::GridShape { columns: 4, rows: 2 });
    row.set_visible_area(Some(VisibleArea {
        scroll_top: 0,
        client_height: 300,
        offset_top: 0,
    }));
    row.focus_pod(Some(5), false);
    assert_eq!(row.pod(5).unwrap().position().top, 223);
    assert_eq!(row.visible_area().unwrap().scroll_top, 180);

    // Already on screen: no scroll.
    row.focus_pod(Some(1), false);
    row.set_visible_area(Some(VisibleArea {
        scroll_top: 0,
        client_height: 800,
        offset_top: 0,
    }));
    row.focus_pod(Some(6), false);
    assert_eq!(row.visible_area().unwrap().scroll_top, 0);
}

// -- keyboard ----------------------------------------------------------------

#[test]
fn arrows_cycle_through_pods() {
    let mut row = row(3);
    press(&mut row, Key::Left, password(0));
    assert_eq!(row.focused_index(), Some(2));
    assert_eq!(row.active_element(), Some(password(2)));

    press(&mut row, Key::Right, password(2));
    assert_eq!(row.focused_index(), Some(0));
    press(&mut row, Key::Right, password(0));
    assert_eq!(row.focused_index(), Some(1));
}

#[test]
fn arrows_skip_hidden_pods() {
    let mut row = row(3);
    row.pods[1].state.hidden = true;
    press(&mut row, Key::Right, password(0));
    assert_eq!(row.focused_index(), Some(2));
}

#[test]
fn arrows_move_the_cursor_while_editing() {
    let mut row = row(3);
    row.type_text("ab");
    press(&mut row, Key::Left, password(0));
    assert_eq!(row.focused_index(), Some(0));
    assert_eq!(row.pod(0).unwrap().password().cursor_pos, 1);
}

#[test]
fn enter_on_empty_password_does_nothing() {
    let mut row = row(2);
    press(&mut row, Key::Enter, password(0));
    assert_eq!(row.activated_index(), None);
    assert_eq!(row.focused_index(), Some(0));
    assert!(row.host().is_empty());
}

#[test]
fn enter_submits_password() {
    let mut row = row(2);
    row.type_text("pw");
    press(&mut row, Key::Enter, password(0));
    assert_eq!(row.activated_index(), Some(0));
    assert_eq!(
        row.host().as_slice(),
        &[
            HostCommand::DisableSigninUi,
            HostCommand::AuthenticateUser {
                username: "user0@example.com".into(),
                password: "pw".into(),
            },
        ]
    );
}

#[test]
fn backspace_edits_password() {
    let mut row = row(1);
    row.type_text("pwx");
    press(&mut row, Key::Backspace, password(0));
    assert_eq!(row.pod(0).unwrap().password().text, "pw");
}

#[test]
fn escape_clears_focus_unless_single() {
    let mut row3 = row(3);
    press(&mut row3, Key::Escape, password(0));
    assert_eq!(row3.focused_index(), None);
    assert_eq!(count_focused(&row3), 0);

    let mut row1 = row(1);
    press(&mut row1, Key::Escape, password(0));
    assert_eq!(row1.focused_index(), Some(0));
}

#[test]
fn disabled_row_ignores_keys() {
    let mut row = row(3);
    row.set_disabled(true);
    press(&mut row, Key::Right, password(0));
    assert_eq!(row.focused_index(), Some(0));
    assert!(!row.tab_sequence().contains(&password(0)));
}

#[test]
fn reset_clears_attempt_and_refocuses() {
    let mut row = row(2);
    row.type_text("pw");
    press(&mut row, Key::Enter, password(0));
    row.set_disabled(true);

    row.reset(true);
    assert!(!row.is_disabled());
    assert!(row.pod(0).unwrap().password().is_empty());
    assert_eq!(row.active_element(), Some(password(0)));
}

#[test]
fn tab_sequence_orders_by_index() {
    let mut row = row(2);
    row.handle_before_show();
    assert_eq!(
        row.tab_sequence(),
        vec![
            password(0),
            EventTarget::pod(1),
            EventTarget::HeaderBar,
            area(0),
            area(1),
        ]
    );

    // Tabbing onto a pod hands focus on to its password field.
    press(&mut row, Key::Tab, password(0));
    assert_eq!(row.focused_index(), Some(1));
    assert_eq!(row.active_element(), Some(password(1)));
}

#[test]
fn header_bar_tab_follows_visibility() {
    let mut row = row(1);
    assert_eq!(row.header_bar_tab_index(), 0);
    row.handle_before_show();
    assert_eq!(row.header_bar_tab_index(), 3);
    row.handle_hide();
    assert_eq!(row.header_bar_tab_index(), 0);
}

// -- action box --------------------------------------------------------------

#[test]
fn keyboard_removal_through_menu() {
    let mut row = row(2);
    row.focus(area(0));
    press(&mut row, Key::Enter, area(0));
    assert!(row.pod(0).unwrap().action_menu().active);
    assert_eq!(row.focused_index(), Some(0));

    press(&mut row, Key::Down, area(0));
    let remove = EventTarget::element(0, PodElement::RemoveCommand);
    assert_eq!(row.active_element(), Some(remove));
    assert_eq!(row.pod(0).unwrap().tab_index(PodElement::RemoveCommand), Some(5));

    press(&mut row, Key::Enter, remove);
    assert!(sent(
        &row,
        &HostCommand::RemoveUser {
            id: "user0@example.com".into()
        }
    ));
}

#[test]
fn escape_leaves_the_menu() {
    let mut row = row(2);
    row.focus(area(0));
    press(&mut row, Key::Enter, area(0));
    press(&mut row, Key::Down, area(0));
    press(
        &mut row,
        Key::Escape,
        EventTarget::element(0, PodElement::RemoveCommand),
    );

    let pod = row.pod(0).unwrap();
    assert!(!pod.action_menu().active);
    assert_eq!(pod.tab_index(PodElement::RemoveCommand), Some(-1));
    assert_eq!(row.active_element(), Some(area(0)));
    assert!(row.host().iter().all(|c| c.name() != "removeUser"));
}

#[test]
fn menu_click_on_unfocused_pod_clears_focus() {
    let mut row = row(3);
    row.click(area(1), Modifiers::default());
    assert_eq!(row.focused_index(), None);
    assert!(row.pod(1).unwrap().action_menu().active);
    assert_eq!(row.active_element(), Some(area(1)));

    row.click(
        EventTarget::element(1, PodElement::RemoveCommand),
        Modifiers::default(),
    );
    assert!(sent(
        &row,
        &HostCommand::RemoveUser {
            id: "user1@example.com".into()
        }
    ));
}

#[test]
fn clicking_elsewhere_closes_menus() {
    let mut row = row(3);
    row.click(area(1), Modifiers::default());
    row.click(EventTarget::pod(2), Modifiers::default());
    assert!(!row.pod(1).unwrap().action_menu().active);
    assert_eq!(row.focused_index(), Some(2));
}

#[test]
fn desktop_removal_needs_confirmation() {
    let mut row = row_with(
        desktop_config(),
        vec![desktop_user("bob"), desktop_user("carol")],
    );
    row.click(area(0), Modifiers::default());
    assert!(row.pod(0).unwrap().action_menu().active);

    row.click(
        EventTarget::element(0, PodElement::RemoveCommand),
        Modifiers::default(),
    );
    assert!(sent(&row, &HostCommand::LogRemoveUserWarningShown));
    assert!(row.pod(0).unwrap().action_menu().warning_shown);
    assert!(row.host().iter().all(|c| c.name() != "removeUser"));

    row.click(
        EventTarget::element(0, PodElement::RemoveWarningButton),
        Modifiers::default(),
    );
    assert!(sent(
        &row,
        &HostCommand::RemoveUser {
            id: "/profiles/bob".into()
        }
    ));
    assert!(!row.pod(0).unwrap().action_menu().active);
}

#[test]
fn pointer_leaving_pod_returns_focus_from_menu_button() {
    let mut row = row(2);
    row.focus(area(0));
    row.handle_mouse_move(EventTarget::pod(1));
    assert_eq!(row.active_element(), Some(password(0)));
    assert!(row.pod(1).unwrap().action_menu().hovered);
    assert!(!row.pod(0).unwrap().action_menu().hovered);
}

// -- pointer -----------------------------------------------------------------

#[test]
fn click_outside_clears_focus() {
    let mut row = row(3);
    row.click(EventTarget::Outside, Modifiers::default());
    assert_eq!(row.focused_index(), None);
}

#[test]
fn clicking_back_after_outside_refocuses_pod() {
    let mut row = row(3);
    row.click(EventTarget::Outside, Modifiers::default());
    assert_eq!(row.active_element(), Some(EventTarget::Outside));

    row.click(password(0), Modifiers::default());
    assert_eq!(row.focused_index(), Some(0));
    assert_eq!(row.active_element(), Some(password(0)));

    row.type_text("pw");
    press(&mut row, Key::Enter, password(0));
    assert_eq!(row.activated_index(), Some(0));
}

#[test]
fn clicking_back_after_escape_refocuses_pod() {
    let mut row = row(3);
    press(&mut row, Key::Escape, password(0));
    assert_eq!(row.focused_index(), None);

    row.click(password(0), Modifiers::default());
    assert_eq!(row.focused_index(), Some(0));
    row.type_text("pw");
    assert_eq!(row.pod(0).unwrap().password().text, "pw");
    press(&mut row, Key::Enter, password(0));
    assert_eq!(row.activated_index(), Some(0));
}

#[test]
fn lone_pod_takes_focus_back() {
    let mut row = row(1);
    row.click(EventTarget::Outside, Modifiers::default());
    assert_eq!(row.focused_index(), Some(0));
    assert_eq!(row.active_element(), Some(password(0)));
}

#[test]
fn touch_view_releases_lone_pod() {
    let mut row = row(1);
    row.set_touch_view(true);
    assert!(row.pod(0).unwrap().action_menu().forced);
    press(&mut row, Key::Escape, password(0));
    assert_eq!(row.focused_index(), None);
}

#[test]
fn user_click_pod_needs_second_click() {
    let mut row = row(2);
    row.set_auth_type(
        "user1@example.com",
        AuthType::UserClick,
        Some("Click to unlock".into()),
    )
    .unwrap();

    row.click(EventTarget::pod(1), Modifiers::default());
    assert_eq!(row.focused_index(), Some(1));
    assert_eq!(
        row.active_element(),
        Some(EventTarget::element(1, PodElement::PasswordLabel))
    );
    assert_eq!(row.activated_index(), None);

    row.click(EventTarget::pod(1), Modifiers::default());
    assert_eq!(row.activated_index(), Some(1));
    assert!(sent(
        &row,
        &HostCommand::AttemptUnlock {
            username: "user1@example.com".into()
        }
    ));
}

#[test]
fn online_sign_in_click_opens_signin() {
    let mut row = row(2);
    row.set_auth_type("user0@example.com", AuthType::OnlineSignIn, None)
        .unwrap();
    row.click(EventTarget::pod(0), Modifiers::default());
    assert!(row.is_disabled());
    assert!(sent(
        &row,
        &HostCommand::ShowSigninUi {
            email: "user0@example.com".into()
        }
    ));
}

#[test]
fn expired_supervised_user_gets_warning() {
    let mut list = users(2);
    list[0].legacy_supervised_user = true;
    let mut row = row_with(PodRowConfig::default(), list);
    row.set_auth_type("user0@example.com", AuthType::OnlineSignIn, None)
        .unwrap();
    row.click(EventTarget::pod(0), Modifiers::default());
    assert_eq!(row.bubble().content(), Some("supervisedUserExpiredTokenWarning"));
    assert!(row.host().iter().all(|c| c.name() != "showSigninUi"));
    assert!(!row.is_disabled());
}

#[test]
fn desktop_click_launches_unlocked_profile() {
    let mut row = row_with(
        desktop_config(),
        vec![desktop_user("bob"), desktop_user("carol")],
    );
    row.click(EventTarget::pod(0), Modifiers::default());
    assert_eq!(row.focused_index(), Some(0));
    assert!(sent(
        &row,
        &HostCommand::LaunchUser {
            profile_path: "/profiles/bob".into()
        }
    ));
    assert_eq!(row.last_focused_index(), Some(0));
}

// -- custom icon -------------------------------------------------------------

fn icon_spec(text: &str, autoshow: bool) -> CustomIconSpec {
    CustomIconSpec {
        id: Some(IconId::Locked),
        tooltip: Some(TooltipSpec::new(text, autoshow)),
        ..CustomIconSpec::default()
    }
}

#[test]
fn autoshow_tooltip_comes_and_goes() {
    let mut row = row(2);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(999);
    assert!(row.bubble().is_hidden());

    row.advance(1);
    assert_eq!(row.bubble().content(), Some("Locked"));
    let icon = row.pod(0).unwrap().custom_icon().unwrap();
    assert_eq!(icon.autoshow_state(), AutoshowState::Active);

    row.advance(5000);
    assert!(row.bubble().is_hidden());
}

#[test]
fn one_advance_runs_chained_timers() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(6000);
    assert!(row.bubble().is_hidden());
    assert_eq!(row.now(), 6000);
    let icon = row.pod(0).unwrap().custom_icon().unwrap();
    assert_eq!(icon.autoshow_state(), AutoshowState::Disabled);
}

#[test]
fn tooltip_needs_focused_pod() {
    let mut row = row(2);
    row.show_user_pod_custom_icon("user1@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(1000);
    assert!(row.bubble().is_hidden());
}

#[test]
fn focus_change_hides_tooltip() {
    let mut row = row(2);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(1000);
    assert!(!row.bubble().is_hidden());
    row.focus_pod(Some(1), false);
    assert!(row.bubble().is_hidden());
}

#[test]
fn hover_shows_tooltip_after_delay() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Hi", false))
        .unwrap();
    row.icon_pointer_enter(0);
    row.advance(999);
    assert!(row.bubble().is_hidden());
    row.advance(1);
    assert_eq!(row.bubble().content(), Some("Hi"));
    row.icon_pointer_leave(0);
    assert!(row.bubble().is_hidden());
}

#[test]
fn typing_cancels_pending_autoshow() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(500);
    row.type_text("a");
    row.advance(2000);
    assert!(row.bubble().is_hidden());
}

#[test]
fn backspace_cancels_pending_autoshow() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(500);
    press(&mut row, Key::Backspace, password(0));
    let icon = row.pod(0).unwrap().custom_icon().unwrap();
    assert_eq!(icon.autoshow_state(), AutoshowState::Disabled);
    assert!(!icon.has_pending_timers());
    row.advance(2000);
    assert!(row.bubble().is_hidden());
}

#[test]
fn hardlock_icon_click_keeps_focus() {
    let mut row = row(2);
    let spec = CustomIconSpec {
        hardlock_on_click: true,
        ..icon_spec("Locked", false)
    };
    row.show_user_pod_custom_icon("user1@example.com", spec)
        .unwrap();
    row.click(
        EventTarget::element(1, PodElement::CustomIcon),
        Modifiers::default(),
    );
    assert!(sent(
        &row,
        &HostCommand::HardlockPod {
            username: "user1@example.com".into()
        }
    ));
    assert_eq!(row.focused_index(), Some(0));
}

#[test]
fn trial_run_icon_reports_key_press() {
    let mut row = row(1);
    let spec = CustomIconSpec {
        is_trial_run: true,
        ..icon_spec("Locked", false)
    };
    row.show_user_pod_custom_icon("user0@example.com", spec)
        .unwrap();
    assert_eq!(row.pod(0).unwrap().tab_index(PodElement::CustomIcon), Some(2));
    press(
        &mut row,
        Key::Enter,
        EventTarget::element(0, PodElement::CustomIcon),
    );
    assert!(sent(
        &row,
        &HostCommand::RecordClickOnLockIcon {
            username: "user0@example.com".into()
        }
    ));
}

#[test]
fn empty_icon_spec_is_ignored() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", CustomIconSpec::default())
        .unwrap();
    assert!(row.pod(0).unwrap().custom_icon().is_none());
}

#[test]
fn hiding_icon_resets_it() {
    let mut row = row(1);
    row.show_user_pod_custom_icon("user0@example.com", icon_spec("Locked", true))
        .unwrap();
    row.advance(1000);
    row.hide_user_pod_custom_icon("user0@example.com").unwrap();
    let icon = row.pod(0).unwrap().custom_icon().unwrap();
    assert!(!icon.is_visible());
    assert_eq!(icon.tooltip_text(), "");
    assert!(row.bubble().is_hidden());
    assert!(!icon.has_pending_timers());
}

// -- timers and layout -------------------------------------------------------

#[test]
fn pods_start_flying_after_first_tick() {
    let mut row = row(2);
    assert!(!row.flying_pods());
    row.advance(0);
    assert!(row.flying_pods());
    row.handle_before_show();
    assert!(!row.flying_pods());
}

#[test]
fn images_finish_loading() {
    let mut row = row(2);
    assert!(row.is_images_loading());
    row.handle_pod_image_load("user0@example.com");
    assert!(row.is_images_loading());
    row.handle_pod_image_load("user1@example.com");
    assert!(!row.is_images_loading());
}

#[test]
fn images_give_up_after_timeout() {
    let mut row = row(2);
    row.advance(2999);
    assert!(row.is_images_loading());
    row.advance(1);
    assert!(!row.is_images_loading());
}

#[test]
fn after_show_waits_for_transition() {
    let mut row = row(2);
    row.handle_before_show();
    row.handle_after_show();
    assert!(!row.is_screen_ready());
    row.advance(999);
    assert!(!row.is_screen_ready());
    row.advance(1);
    assert!(row.is_screen_ready());
    assert_eq!(row.active_element(), Some(password(0)));
}

#[test]
fn after_show_completes_once_on_transition_end() {
    let mut row = row(2);
    row.handle_after_show();
    row.transition_end(0);
    assert!(row.is_screen_ready());
    assert_eq!(row.next_deadline().filter(|&at| at >= 1000 && at < 3000), None);
}

#[test]
fn after_show_without_focus_is_immediate() {
    let mut row = row_with(
        desktop_config(),
        vec![desktop_user("bob"), desktop_user("carol")],
    );
    row.handle_after_show();
    assert!(row.is_screen_ready());
}

#[test]
fn narrow_window_hides_overflow() {
    let mut row = row(5);
    row.on_window_resize(400, 300);
    assert_eq!(row.shape(), podrow_ui::GridShape { columns: 1, rows: 1 });
    assert!(!row.pod(0).unwrap().is_hidden());
    assert!((1..5).all(|i| row.pod(i).unwrap().is_hidden()));
    let position = row.pod(0).unwrap().position();
    assert_eq!((position.left, position.top), (10, 10));
    assert_eq!(row.preferred_size(), (200, 233));
}

#[test]
fn resize_within_shape_keeps_positions() {
    let mut row = row(3);
    let before: Vec<_> = row.pods().iter().map(|p| p.position()).collect();
    row.on_window_resize(1200, 700);
    let after: Vec<_> = row.pods().iter().map(|p| p.position()).collect();
    assert_eq!(before, after);
    assert_eq!(row.viewport(), (1200, 700));
}

// -- inbound API -------------------------------------------------------------

#[test]
fn missing_pods_are_reported() {
    let mut row = row(1);
    let missing = "nobody@example.com";
    assert!(matches!(
        row.set_auth_type(missing, AuthType::UserClick, None),
        Err(PodRowError::PodNotFound(ref u)) if u == missing
    ));
    assert!(row.remove_user_pod(missing).is_err());
    assert!(row.hide_user_pod_custom_icon(missing).is_err());
    assert!(row.update_user_image(missing).is_err());
    assert!(
        row.show_user_pod_custom_icon(missing, icon_spec("x", false))
            .is_err()
    );
    assert!(matches!(
        row.run_app("nope", false),
        Err(PodRowError::PodNotFound(_))
    ));
}

#[test]
fn removing_a_pod_shifts_indices() {
    let mut row = row(3);
    row.focus_pod(Some(2), false);
    row.remove_user_pod("user0@example.com").unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(row.focused_index(), Some(1));
    assert_eq!(row.active_element(), Some(password(1)));

    row.remove_user_pod("user2@example.com").unwrap();
    assert_eq!(row.focused_index(), None);
    assert_eq!(count_focused(&row), 0);
}

#[test]
fn image_salt_counts_up() {
    let mut row = row(2);
    row.update_user_image("user0@example.com").unwrap();
    row.update_user_image("user1@example.com").unwrap();
    assert_eq!(row.pod(0).unwrap().image_salt(), 1);
    assert_eq!(row.pod(1).unwrap().image_salt(), 2);
    assert!(row.pod(1).unwrap().render().image_url.ends_with("?id=2"));
}

#[test]
fn last_wallpaper_reloads() {
    let mut row = row(2);
    row.load_last_wallpaper();
    assert!(sent(
        &row,
        &HostCommand::LoadWallpaper {
            username: "user0@example.com".into()
        }
    ));
}

#[test]
fn kiosk_apps_follow_user_pods() {
    let mut row = row(1);
    row.set_apps(vec![AppRecord::new("app1", "Clock")]);
    assert_eq!(row.len(), 2);
    assert!(sent(&row, &HostCommand::KioskAppsLoaded));

    row.advance(500);
    assert!(sent(&row, &HostCommand::CheckKioskAppLaunchError));

    row.set_should_show_apps(false);
    assert_eq!(row.len(), 1);
}

#[test]
fn kiosk_diagnostic_mode_needs_confirmation() {
    let mut row = row(1);
    row.set_apps(vec![AppRecord::new("app1", "Clock")]);
    row.run_app("app1", true).unwrap();
    let prompt = row.diagnostic_prompt().unwrap();
    assert_eq!(prompt.message, "confirmKioskAppDiagnosticModeFormat:Clock");
    assert_eq!(row.focused_index(), Some(1));

    row.confirm_diagnostic_mode();
    assert!(row.diagnostic_prompt().is_none());
    assert!(sent(
        &row,
        &HostCommand::LaunchKioskApp {
            app_id: "app1".into(),
            diagnostic_mode: true,
        }
    ));
}

#[test]
fn kiosk_plain_launch() {
    let mut row = row(1);
    row.set_apps(vec![AppRecord::new("app1", "Clock")]);
    row.run_app("app1", false).unwrap();
    assert!(row.diagnostic_prompt().is_none());
    assert!(sent(
        &row,
        &HostCommand::LaunchKioskApp {
            app_id: "app1".into(),
            diagnostic_mode: false,
        }
    ));
}

#[test]
fn public_session_expands_and_launches() {
    let mut row = row_with(
        PodRowConfig::default(),
        vec![UserRecord::new("a@example.com", "A"), public_user()],
    );
    row.click(EventTarget::pod(1), Modifiers::default());
    assert_eq!(row.activated_index(), Some(1));
    assert!(row.pod(1).unwrap().public_session().unwrap().is_expanded());
    let enter = EventTarget::element(1, PodElement::EnterButton);
    assert_eq!(row.active_element(), Some(enter));

    row.set_public_session_keyboard_layouts("public@example.com", "en-US", us_layout())
        .unwrap();
    row.advance(200);
    press(&mut row, Key::Enter, enter);
    assert!(sent(
        &row,
        &HostCommand::LaunchPublicSession {
            username: "public@example.com".into(),
            locale: "en-US".into(),
            keyboard_layout: "xkb:us::eng".into(),
        }
    ));

    row.focus_pod(Some(0), false);
    assert!(!row.pod(1).unwrap().public_session().unwrap().is_expanded());
}

#[test]
fn public_session_selection_is_validated() {
    let mut row = row_with(PodRowConfig::default(), vec![public_user()]);
    assert!(matches!(
        row.select_public_session_locale("public@example.com", "fr"),
        Err(PodRowError::InputRejected(_))
    ));

    // A list for a locale that is not selected is stale.
    row.set_public_session_keyboard_layouts("public@example.com", "de", us_layout())
        .unwrap();
    let public = row.pod(0).unwrap().public_session().unwrap();
    assert!(public.keyboard_layouts().is_empty());

    row.host_mut().clear();
    row.select_public_session_locale("public@example.com", "de")
        .unwrap();
    assert_eq!(
        row.host().as_slice(),
        &[HostCommand::GetPublicSessionKeyboardLayouts {
            username: "public@example.com".into(),
            locale: "de".into(),
        }]
    );
    assert!(
        row.select_public_session_keyboard_layout("public@example.com", "xkb:fr::fra")
            .is_err()
    );
}

#[test]
fn public_session_display_name_updates_view() {
    let mut row = row_with(PodRowConfig::default(), vec![public_user()]);
    row.set_public_session_display_name("public@example.com", "Library")
        .unwrap();
    assert_eq!(row.pod(0).unwrap().render().name, "Library");
}

#[test]
fn snapshot_serializes() {
    let row = row(2);
    let json = serde_json::to_value(row.snapshot()).unwrap();
    assert_eq!(json["focused"], 0);
    assert_eq!(json["pods"][1]["kind"], "user");
    assert_eq!(json["pods"][0]["auth_type"], "offlinePassword");
}

mod prop {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Key(Key, EventTarget),
        Click(EventTarget),
        Focus(Option<usize>),
        Advance(u64),
        Type(char),
        Disable(bool),
    }

    fn target() -> impl Strategy<Value = EventTarget> {
        let element = prop_oneof![
            Just(PodElement::Pod),
            Just(PodElement::PasswordInput),
            Just(PodElement::ActionBoxArea),
            Just(PodElement::RemoveCommand),
            Just(PodElement::CustomIcon),
        ];
        prop_oneof![
            (0usize..4, element).prop_map(|(i, e)| EventTarget::element(i, e)),
            Just(EventTarget::HeaderBar),
            Just(EventTarget::Outside),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        let key = prop_oneof![
            Just(Key::Left),
            Just(Key::Right),
            Just(Key::Down),
            Just(Key::Enter),
            Just(Key::Escape),
            Just(Key::Tab),
        ];
        prop_oneof![
            (key, target()).prop_map(|(k, t)| Op::Key(k, t)),
            target().prop_map(Op::Click),
            proptest::option::of(0usize..4).prop_map(Op::Focus),
            (0u64..3000).prop_map(Op::Advance),
            proptest::char::range('a', 'z').prop_map(Op::Type),
            any::<bool>().prop_map(Op::Disable),
        ]
    }

    proptest! {
        #[test]
        fn at_most_one_pod_is_focused(ops in proptest::collection::vec(op(), 0..40)) {
            let mut row = row(3);
            row.show_user_pod_custom_icon("user1@example.com", icon_spec("t", true))
                .unwrap();
            for op in ops {
                match op {
                    Op::Key(key, target) => row.key_down(KeyEvent::new(key, target)),
                    Op::Click(target) => row.click(target, Modifiers::default()),
                    Op::Focus(index) => row.focus_pod(index, false),
                    Op::Advance(ms) => row.advance(ms),
                    Op::Type(ch) => row.type_text(&ch.to_string()),
                    Op::Disable(disabled) => row.set_disabled(disabled),
                }
                let focused: Vec<usize> = row
                    .pods()
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.is_focused())
                    .map(|(i, _)| i)
                    .collect();
                prop_assert!(focused.len() <= 1);
                prop_assert_eq!(focused.first().copied(), row.focused_index());
                prop_assert!(!row.inside_focus_pod);
            }
        }
    }
}
