use super::*;
use crate::arrangement::Badge;
use crate::test_support::{fast_settings, fixture, fixture_with, layout, HostCall, StaticProfiles};
use sessiondeck_common::{HostError, NavDirection, Rect, SessionError, Side};
use std::time::Duration;

async fn open_all(controller: &SessionController, ids: &[&str]) {
    for id in ids {
        controller.open_tab(id).await.unwrap();
    }
}

fn error_toasts(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Toast {
                level: NotificationLevel::Error,
                message,
            } => Some(message.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn opening_an_open_tab_only_focuses_it() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2", "p1"]).await;

    assert_eq!(f.controller.tab_ids(), vec!["p1", "p2"]);
    assert_eq!(f.host.created(), vec!["p1", "p2"]);
    assert_eq!(f.controller.active_id().as_deref(), Some("p1"));
    assert_eq!(f.host.last_arrangement(), Some(HostCall::Active("p1".into())));
}

#[tokio::test(start_paused = true)]
async fn tab_titles_come_from_the_profile_directory() {
    let f = fixture(&["p1"]);
    open_all(&f.controller, &["p1", "p9"]).await;

    let snapshot = f.controller.snapshot();
    assert_eq!(snapshot.tabs[0].title, "Name p1");
    assert_eq!(snapshot.tabs[1].title, "p9");
}

#[tokio::test(start_paused = true)]
async fn invalid_profile_ids_are_rejected() {
    let f = fixture(&[]);
    let err = f.controller.open_tab("").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidProfile(_)));
    assert!(f.host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_attach_removes_the_tab() {
    let f = fixture(&["p1", "p2"]);
    let mut events = f.controller.subscribe();
    f.host.fail_attach_for("p2");

    f.controller.open_tab("p1").await.unwrap();
    let err = f.controller.open_tab("p2").await.unwrap_err();

    assert!(matches!(err, SessionError::Host(HostError::AttachFailed { .. })));
    assert_eq!(f.controller.tab_ids(), vec!["p1"]);
    assert_eq!(f.controller.active_id().as_deref(), Some("p1"));
    assert_eq!(error_toasts(&events.drain()).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn split_never_pairs_a_tab_with_itself() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;
    f.controller.set_active("p1", Side::Left).await.unwrap();

    assert!(f.controller.split_with("p2").await.unwrap());
    assert!(!f.controller.split_with("p1").await.unwrap());
    assert!(!f.controller.apply_split(Some(("p3", "p3"))).await);
    assert!(!f.controller.apply_split(Some(("p1", "zz"))).await);
    assert_eq!(
        f.host.last_arrangement(),
        Some(HostCall::Split("p1".into(), "p2".into(), 0.5))
    );

    // Re-targeting a side to the tab on the other side swaps them.
    f.controller.set_active("p3", Side::Right).await.unwrap();
    f.controller.set_active("p1", Side::Right).await.unwrap();
    let split = f.controller.snapshot().split.unwrap();
    assert_eq!((split.left_id.as_str(), split.right_id.as_str()), ("p3", "p1"));
    assert_eq!(f.controller.badge("p1"), Some(Badge::Right));
    assert_eq!(f.controller.badge("p2"), None);
}

#[tokio::test(start_paused = true)]
async fn set_active_requires_an_open_tab() {
    let f = fixture(&["p1"]);
    let err = f.controller.set_active("p1", Side::Left).await.unwrap_err();
    assert!(matches!(err, SessionError::NotOpen(id) if id == "p1"));
}

#[tokio::test(start_paused = true)]
async fn closing_a_split_member_promotes_its_partner() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;
    f.controller.set_active("p1", Side::Left).await.unwrap();
    f.controller.split_with("p2").await.unwrap();

    assert!(f.controller.close_tab("p1").await.unwrap());

    let snapshot = f.controller.snapshot();
    assert!(snapshot.split.is_none());
    assert_eq!(snapshot.active_id.as_deref(), Some("p2"));
    assert_eq!(snapshot.tab_ids(), vec!["p2", "p3"]);
    assert!(f.host.calls().contains(&HostCall::Destroy("p1".into())));
    assert_eq!(f.host.last_arrangement(), Some(HostCall::Active("p2".into())));
}

#[tokio::test(start_paused = true)]
async fn closing_the_active_tab_picks_a_neighbor() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;

    f.controller.set_active("p2", Side::Left).await.unwrap();
    f.controller.close_tab("p2").await.unwrap();
    assert_eq!(f.controller.active_id().as_deref(), Some("p3"));

    f.controller.close_tab("p3").await.unwrap();
    assert_eq!(f.controller.active_id().as_deref(), Some("p1"));

    f.controller.close_tab("p1").await.unwrap();
    assert_eq!(f.controller.active_id(), None);
    assert!(!f.controller.close_tab("p1").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn edit_mode_click_toggles_logged_out() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;

    f.controller.set_edit_mode(true);
    f.controller.click("p1", Side::Left).await.unwrap();
    assert_eq!(f.controller.snapshot().logged_out_ids(), vec!["p1"]);
    assert_eq!(f.controller.active_id().as_deref(), Some("p2"));
    assert!(f.host.calls().contains(&HostCall::LoggedOut("p1".into())));

    f.controller.click("p1", Side::Left).await.unwrap();
    assert!(f.controller.snapshot().logged_out_ids().is_empty());
    assert!(f.host.calls().contains(&HostCall::LoggedIn("p1".into())));

    f.controller.set_edit_mode(false);
    f.controller.click("p2", Side::Left).await.unwrap();
    assert_eq!(f.controller.active_id().as_deref(), Some("p2"));
}

#[tokio::test(start_paused = true)]
async fn opening_a_logged_out_tab_logs_it_in() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.logout("p1").await.unwrap();

    f.controller.open_tab("p1").await.unwrap();

    assert!(f.controller.snapshot().logged_out_ids().is_empty());
    assert_eq!(f.controller.active_id().as_deref(), Some("p1"));
    assert_eq!(f.host.created(), vec!["p1", "p2"]);
}

#[tokio::test(start_paused = true)]
async fn logout_rolls_back_when_the_host_refuses() {
    let f = fixture(&["p1"]);
    f.controller.open_tab("p1").await.unwrap();
    let mut events = f.controller.subscribe();
    f.host.fail_command("mark_logged_out", true);

    let err = f.controller.logout("p1").await.unwrap_err();

    assert!(matches!(err, SessionError::Host(HostError::Rejected { .. })));
    assert!(f.controller.snapshot().logged_out_ids().is_empty());
    assert_eq!(error_toasts(&events.drain()).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn navigation_wraps_around() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;

    let next = f.controller.navigate(NavDirection::Next, None).await.unwrap();
    assert_eq!(next.as_deref(), Some("p1"));
    let prev = f.controller.navigate(NavDirection::Prev, None).await.unwrap();
    assert_eq!(prev.as_deref(), Some("p3"));
}

#[tokio::test(start_paused = true)]
async fn navigation_in_a_split_moves_one_side() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;
    f.controller.set_active("p1", Side::Left).await.unwrap();
    f.controller.split_with("p2").await.unwrap();

    let next = f
        .controller
        .navigate(NavDirection::Next, Some(Side::Right))
        .await
        .unwrap();

    assert_eq!(next.as_deref(), Some("p3"));
    let split = f.controller.snapshot().split.unwrap();
    assert_eq!((split.left_id.as_str(), split.right_id.as_str()), ("p1", "p3"));
}

#[tokio::test(start_paused = true)]
async fn reorder_moves_tabs() {
    let f = fixture(&["p1", "p2", "p3", "p4"]);
    open_all(&f.controller, &["p1", "p2", "p3", "p4"]).await;

    assert!(f.controller.reorder("p4", "p1", false));
    assert_eq!(f.controller.tab_ids(), vec!["p4", "p1", "p2", "p3"]);
    assert!(!f.controller.reorder("p2", "p2", true));
    assert!(!f.controller.reorder("p2", "zz", true));
}

#[tokio::test(start_paused = true)]
async fn untracked_sessions_are_not_auto_saved() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.reorder("p2", "p1", false);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(f.store.inner.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn first_manual_save_starts_tracking() {
    let f = fixture(&["p1", "p2"]);
    let err = f.controller.save_current_layout(None).await.unwrap_err();
    assert!(matches!(err, SessionError::EmptySession));

    open_all(&f.controller, &["p1", "p2"]).await;
    let first = f.controller.save_current_layout(Some("Mine")).await.unwrap();
    let second = f.controller.save_current_layout(None).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(first.name, "Mine");
    assert_eq!(f.controller.current_layout_id(), Some(first.id));
    assert_eq!(f.controller.list_layouts().await.unwrap().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn tracked_changes_are_saved_once_settled() {
    let f = fixture(&["p1", "p2", "p3"]);
    open_all(&f.controller, &["p1", "p2", "p3"]).await;
    let saved = f.controller.save_current_layout(Some("Mine")).await.unwrap();
    assert_eq!(f.store.inner.write_count(), 1);

    f.controller.reorder("p3", "p1", false);
    tokio::time::sleep(Duration::from_millis(100)).await;
    f.controller.reorder("p2", "p3", false);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(f.store.inner.write_count(), 1);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(f.store.inner.write_count(), 2);

    let stored = f.controller.list_layouts().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, saved.id);
    assert_eq!(stored[0].name, "Mine");
    assert_eq!(stored[0].tabs, f.controller.tab_ids());
}

#[tokio::test(start_paused = true)]
async fn auto_save_failure_is_reported_and_kept_local() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.save_current_layout(None).await.unwrap();
    let mut events = f.controller.subscribe();
    f.store.fail_saves(true);

    f.controller.reorder("p2", "p1", false);
    tokio::time::sleep(Duration::from_secs(1)).await;

    let toasts = error_toasts(&events.drain());
    assert_eq!(toasts.len(), 1);
    assert!(toasts[0].starts_with("Auto-save failed"));
    assert_eq!(f.controller.tab_ids(), vec!["p2", "p1"]);
}

#[tokio::test(start_paused = true)]
async fn disabled_auto_save_never_writes() {
    let mut settings = fast_settings();
    settings.auto_save = false;
    let f = fixture_with(settings, StaticProfiles::new(&["p1", "p2"]));
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.save_current_layout(None).await.unwrap();

    f.controller.reorder("p2", "p1", false);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(f.store.inner.write_count(), 1);
    assert_eq!(f.controller.auto_save_now().await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn committed_ratio_is_persisted() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.set_active("p1", Side::Left).await.unwrap();
    f.controller.split_with("p2").await.unwrap();
    f.controller.save_current_layout(None).await.unwrap();
    let writes = f.store.inner.write_count();

    assert_eq!(f.controller.set_split_ratio(0.95, false).await, 0.8);
    assert_eq!(
        f.host.last_arrangement(),
        Some(HostCall::Split("p1".into(), "p2".into(), 0.8))
    );
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(f.store.inner.write_count(), writes);

    for ratio in [0.4, 0.35, 0.3] {
        f.controller.set_split_ratio(ratio, true).await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(f.store.inner.write_count(), writes + 1);

    let stored = f.controller.list_layouts().await.unwrap();
    assert_eq!(stored[0].split.as_ref().map(|s| s.ratio), Some(0.3));
}

#[tokio::test(start_paused = true)]
async fn ratio_without_split_only_seeds_the_next_split() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.save_current_layout(None).await.unwrap();
    let writes = f.store.inner.write_count();
    let mut events = f.controller.subscribe();

    assert_eq!(f.controller.set_split_ratio(0.3, true).await, 0.3);
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!events
        .drain()
        .iter()
        .any(|e| matches!(e, Event::SplitChanged)));
    assert_eq!(f.store.inner.write_count(), writes);

    f.controller.set_active("p1", Side::Left).await.unwrap();
    f.controller.split_with("p2").await.unwrap();
    assert_eq!(f.controller.snapshot().split.map(|s| s.ratio), Some(0.3));
}

#[tokio::test(start_paused = true)]
async fn deleting_the_tracked_layout_stops_tracking() {
    let f = fixture(&["p1"]);
    f.controller.open_tab("p1").await.unwrap();
    let saved = f.controller.save_current_layout(None).await.unwrap();

    let renamed = f.controller.rename_layout(&saved.id, "Renamed").await.unwrap();
    assert_eq!(renamed.name, "Renamed");

    assert!(f.controller.delete_layout(&saved.id).await.unwrap());
    assert_eq!(f.controller.current_layout_id(), None);
    assert!(!f.controller.delete_layout(&saved.id).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn suggested_name_is_timestamped() {
    let f = fixture(&[]);
    let name = f.controller.suggested_layout_name();
    assert!(name.starts_with("Layout "));
    assert_eq!(name.len(), "Layout 2024-05-01 14:30".len());
}

#[tokio::test(start_paused = true)]
async fn resizes_coalesce_into_one_bounds_push() {
    let f = fixture(&[]);
    for step in 0..10 {
        f.controller.resize_window(1000.0 + f64::from(step) * 10.0, 700.0);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(f.host.bounds(), vec![Rect::new(0, 36, 1090, 664)]);
}

#[tokio::test(start_paused = true)]
async fn hiding_the_tab_strip_grows_the_content_area() {
    let f = fixture(&[]);
    f.controller.refresh_bounds().await;
    f.controller.set_tab_strip_visible(false);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        f.host.bounds(),
        vec![Rect::new(0, 36, 1280, 764), Rect::new(0, 0, 1280, 800)]
    );
    assert!(!f.controller.snapshot().tab_strip_visible);
}

#[tokio::test(start_paused = true)]
async fn grid_cells_become_active_in_place() {
    let f = fixture(&["p1", "p2", "p3", "p4"]);
    open_all(&f.controller, &["p1", "p2", "p3", "p4"]).await;

    let grid = GridLayout::from_ids(["p1", "p2", "p3", "p4", "p9"]);
    assert!(f.controller.apply_grid(Some(grid)).await);
    assert_eq!(f.controller.visible_ids(), vec!["p1", "p2", "p3", "p4"]);

    f.controller.set_active("p3", Side::Left).await.unwrap();
    assert_eq!(f.controller.badge("p3"), Some(Badge::Cell(3)));
    assert_eq!(
        f.host.last_arrangement(),
        Some(HostCall::Grid(vec!["p1".into(), "p2".into(), "p3".into(), "p4".into()]))
    );

    assert!(f.controller.apply_grid(None).await);
    assert_eq!(f.controller.visible_ids(), vec!["p3"]);
    assert!(f.controller.select_grid(0).await);
    assert_eq!(f.controller.visible_ids().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn start_opens_the_requested_profile() {
    let f = fixture(&["p1"]);
    let report = f.controller.start(Initial::Profile("p1".into())).await.unwrap();

    assert!(report.is_none());
    assert_eq!(f.controller.tab_ids(), vec!["p1"]);
    assert_eq!(f.host.bounds(), vec![Rect::new(0, 36, 1280, 764)]);
}

#[tokio::test(start_paused = true)]
async fn start_prefers_a_queued_layout() {
    let f = fixture(&["p1", "p2", "p3"]);
    f.controller
        .queue_for_next_window(layout("queued", &["p2", "p3"]))
        .await;

    let report = f
        .controller
        .start(Initial::Profile("p1".into()))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.layout_id, "queued");
    assert_eq!(f.controller.tab_ids(), vec!["p2", "p3"]);
    assert_eq!(f.controller.current_layout_id().as_deref(), Some("queued"));

    // The handoff is one-shot.
    assert!(f.store.take_pending().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn start_with_a_missing_layout_reports_status() {
    let f = fixture(&["p1"]);
    let mut events = f.controller.subscribe();

    let err = f
        .controller
        .start(Initial::Layout("gone".into()))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::LayoutNotFound(id) if id == "gone"));
    assert!(events.drain().iter().any(|e| matches!(
        e,
        Event::LayoutStatus {
            level: NotificationLevel::Error,
            ..
        }
    )));
    assert!(f.controller.tab_ids().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_the_controller_cancels_timers() {
    let f = fixture(&["p1", "p2"]);
    open_all(&f.controller, &["p1", "p2"]).await;
    f.controller.save_current_layout(None).await.unwrap();
    f.controller.reorder("p2", "p1", false);

    let store = f.store.clone();
    drop(f);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(store.inner.write_count(), 1);
}
