use super::*;
use crate::{
    foundation::error::PagespotError,
    manifest::loader::parse_manifest,
    navigation::guard::NavCommand,
};

const BOOK: &str = include_str!("../../data/book.json");

fn book() -> ManifestDef {
    parse_manifest(BOOK.as_bytes()).unwrap()
}

fn session() -> ReaderSession {
    let mut s = ReaderSession::new(ReaderConfig::default());
    s.load_manifest(book());
    s
}

fn active(s: &ReaderSession) -> Option<&str> {
    s.state().playback.active_hotspot_id.as_deref()
}

#[test]
fn loading_a_manifest_lands_on_the_first_page() {
    let s = session();
    assert_eq!(s.pages().len(), 3);
    assert_eq!(
        s.available_pages(),
        &[PageNumber(1), PageNumber(2), PageNumber(3)]
    );
    assert_eq!(s.current_page(), PageNumber(1));
    assert_eq!(s.active_page().map(|p| p.id.as_str()), Some("1"));
    assert_eq!(
        s.page_image_url().as_deref(),
        Some("/assets/page_001.jpg")
    );
}

#[test]
fn keyboard_navigation_is_gated() {
    let mut s = session();
    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 0),
        NavOutcome::Moved(PageNumber(2))
    );
    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 100),
        NavOutcome::RejectedCooldown
    );
    let held = NavInput::Key {
        key: "ArrowRight".to_string(),
        repeat: true,
    };
    assert_eq!(s.navigate(&held, 5_000), NavOutcome::RejectedRepeat);
    assert_eq!(s.current_page(), PageNumber(2));

    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 600),
        NavOutcome::Moved(PageNumber(3))
    );
    let placeholder = s.active_page().unwrap();
    assert!(placeholder.placeholder);
    assert_eq!(placeholder.page_image, "page_003.jpg");

    assert_eq!(s.navigate(&NavInput::key("Enter"), 2_000), NavOutcome::Unchanged);
    assert_eq!(
        s.navigate(&NavInput::Command(NavCommand::First), 2_000),
        NavOutcome::Moved(PageNumber(1))
    );
}

#[test]
fn clicks_use_side_zones() {
    let mut s = session();
    assert_eq!(
        s.navigate(&NavInput::Click { relative_x: 0.2 }, 0),
        NavOutcome::Unchanged
    );
    assert_eq!(
        s.navigate(&NavInput::Click { relative_x: 0.8 }, 0),
        NavOutcome::Moved(PageNumber(2))
    );
}

#[test]
fn selecting_a_hotspot_zooms_onto_its_centroid() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    assert_eq!(s.viewport(), Some(full_viewport(ImageSize::new(1000.0, 800.0))));
    assert!(s.spotlight().is_none());

    assert!(s.select_hotspot("h1", 0));
    assert_eq!(active(&s), Some("h1"));
    assert!(s.state().is_read("h1"));
    let queue: Vec<&str> = s.state().playback.queue.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(queue, vec!["h1-a", "h1-b"]);

    let zoom = s.state().zoom;
    assert_eq!(zoom.target_scale, 2.5);
    assert!(zoom.is_animating);
    assert_eq!(zoom.focal_point, Some(Point::new(200.0, 200.0)));

    let vp = s.viewport().unwrap();
    assert_eq!(
        (vp.x, vp.y, vp.width, vp.height),
        (0.0, 40.0, 400.0, 320.0)
    );
    assert_eq!(s.view_box().as_deref(), Some("0 40 400 320"));
    let stops = s.spotlight().unwrap();
    assert_eq!(stops.transparent_stop, 28.0);
    assert_eq!(stops.feather_end, 68.0);

    assert!(s.finish_zoom_animation());
    assert_eq!(s.state().zoom.scale, 2.5);
    assert!(!s.state().zoom.is_animating);
}

#[test]
fn reselecting_zooms_out_then_clears_after_delay() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);
    s.finish_zoom_animation();

    assert!(s.select_hotspot("h1", 1_000));
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.state().zoom.target_scale, 1.0);
    assert_eq!(s.state().zoom.focal_point, None);
    assert_eq!(active(&s), Some("h1"));

    assert!(!s.tick(1_599));
    assert_eq!(active(&s), Some("h1"));
    assert!(s.tick(1_600));
    assert_eq!(active(&s), None);
}

#[test]
fn new_selection_supersedes_pending_clear() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);
    s.select_hotspot("h1", 100);
    s.select_hotspot("h2", 200);

    assert!(!s.tick(5_000));
    assert_eq!(active(&s), Some("h2"));
    assert_eq!(
        s.zoom_selection().map(|z| z.hotspot_id.as_str()),
        Some("h2")
    );
}

#[test]
fn without_image_size_selection_does_not_zoom() {
    let mut s = session();
    assert!(s.select_hotspot("h1", 0));
    assert_eq!(active(&s), Some("h1"));
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.state().zoom, ZoomState::default());
    assert!(s.viewport().is_none());
}

#[test]
fn auto_zoom_flag_disables_zoom() {
    let mut config = ReaderConfig::default();
    config.feature_flags.enable_auto_zoom = false;
    let mut s = ReaderSession::new(config);
    s.load_manifest(book());
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);
    assert!(s.zoom_selection().is_none());
    assert_eq!(active(&s), Some("h1"));
}

#[test]
fn page_change_clears_dangling_selection_and_zoom() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);

    s.navigate(&NavInput::key("ArrowRight"), 0);
    assert_eq!(s.current_page(), PageNumber(2));
    assert_eq!(active(&s), None);
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.state().zoom, ZoomState::default());
    assert!(s.image_size().is_none());
    assert!(s.state().is_read("h1"));
}

#[test]
fn hiding_hotspots_clears_selection() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);

    assert!(!s.toggle_hotspots());
    assert_eq!(active(&s), None);
    assert!(s.zoom_selection().is_none());
    assert!(!s.select_hotspot("h1", 10));
    assert!(s.hotspot_at(Point::new(200.0, 200.0)).is_none());
    assert_eq!(s.hotspot_outlines().len(), 2);

    assert!(s.toggle_hotspots());
    assert_eq!(
        s.hotspot_at(Point::new(200.0, 200.0)).map(|h| h.id.as_str()),
        Some("h1")
    );
}

#[test]
fn outlines_serialize_points_unchanged() {
    let s = session();
    let outlines = s.hotspot_outlines();
    assert_eq!(outlines[0].0, "h1");
    assert_eq!(outlines[0].1, "100,100 300,100 300,300 100,300");
}

#[test]
fn commands_move_to_the_hotspot_page() {
    let mut s = session();
    assert!(s.dispatch(&PlaybackCommand::GotoHotspot {
        hotspot_id: "h3".to_string()
    }));
    assert_eq!(s.current_page(), PageNumber(2));
    assert_eq!(active(&s), Some("h3"));
    assert!(s.state().is_read("h3"));

    assert!(!s.dispatch(&PlaybackCommand::PlayHotspot {
        hotspot_id: "nope".to_string()
    }));
    assert_eq!(active(&s), Some("h3"));

    assert!(s.dispatch(&PlaybackCommand::StopPlayback));
    assert_eq!(active(&s), None);
}

#[test]
fn raw_transitions_cannot_leave_a_foreign_active_hotspot() {
    let mut s = session();
    s.apply(ReaderAction::SetPlaybackPhase(
        PlaybackPhaseUpdate::new(PlaybackPhase::Playing).with_hotspot("h3"),
    ));
    assert_eq!(active(&s), None);
    s.apply(ReaderAction::SetPlaybackPhase(
        PlaybackPhaseUpdate::new(PlaybackPhase::Playing).with_hotspot("h2"),
    ));
    assert_eq!(active(&s), Some("h2"));
}

#[test]
fn failed_load_surfaces_error_and_stale_results_are_dropped() {
    let mut s = ReaderSession::new(ReaderConfig::default());
    let stale = s.begin_manifest_load();
    let latest = s.begin_manifest_load();
    assert!(!s.complete_manifest_load(stale, Ok(book())));
    assert!(s.pages().is_empty());

    assert!(s.complete_manifest_load(
        latest,
        Err(PagespotError::manifest_unavailable("HTTP 404"))
    ));
    assert_eq!(s.state().playback.phase, PlaybackPhase::Error);
    assert!(
        s.state()
            .playback
            .error
            .as_deref()
            .is_some_and(|e| e.contains("HTTP 404"))
    );
    assert!(s.active_page().is_none());

    s.load_manifest(book());
    assert_eq!(s.state().playback.phase, PlaybackPhase::Idle);
    assert_eq!(s.pages().len(), 3);
}

#[test]
fn reload_keeps_current_page_when_still_available() {
    let mut s = session();
    s.navigate(&NavInput::key("End"), 0);
    assert_eq!(s.current_page(), PageNumber(3));
    s.load_manifest(book());
    assert_eq!(s.current_page(), PageNumber(3));

    let mut smaller = book();
    smaller.total_pages = Some(2.0);
    s.load_manifest(smaller);
    assert_eq!(s.current_page(), PageNumber(1));
}

#[test]
fn commands_that_move_the_selection_release_the_zoom() {
    let mut s = session();
    let image = ImageSize::new(1000.0, 800.0);
    s.set_image_size(image);
    s.select_hotspot("h1", 0);
    s.finish_zoom_animation();

    assert!(s.dispatch(&PlaybackCommand::GotoHotspot {
        hotspot_id: "h2".to_string()
    }));
    assert_eq!(active(&s), Some("h2"));
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.viewport(), Some(full_viewport(image)));
    assert!(s.spotlight().is_none());
    assert_eq!(s.state().zoom.target_scale, 1.0);
    assert_eq!(s.state().zoom.focal_point, None);

    s.select_hotspot("h1", 1_000);
    assert_eq!(
        s.zoom_selection().map(|z| z.hotspot_id.as_str()),
        Some("h1")
    );
    assert!(s.dispatch(&PlaybackCommand::StopPlayback));
    assert_eq!(active(&s), None);
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.viewport(), Some(full_viewport(image)));
    assert!(s.spotlight().is_none());
    assert_eq!(s.state().zoom.focal_point, None);
}

#[test]
fn pausing_clears_selection_and_zoom_together() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);

    s.dispatch(&PlaybackCommand::PausePlayback);
    assert_eq!(active(&s), None);
    assert!(s.zoom_selection().is_none());
    assert_eq!(s.state().zoom.target_scale, 1.0);
}

#[test]
fn raw_clear_releases_the_zoom() {
    let mut s = session();
    s.set_image_size(ImageSize::new(1000.0, 800.0));
    s.select_hotspot("h1", 0);

    s.apply(ReaderAction::ClearPlayback);
    assert!(s.zoom_selection().is_none());
    assert!(s.spotlight().is_none());
}

fn sparse_keys(keys: &[u32]) -> ManifestDef {
    let groups = keys
        .iter()
        .map(|k| format!(r#""{k}": {{ "pageImage": "p{k}.png", "hotspots": [] }}"#))
        .collect::<Vec<_>>()
        .join(",");
    parse_manifest(format!(r#"{{ "slug": "s", "page_groups": {{ {groups} }} }}"#).as_bytes())
        .unwrap()
}

#[test]
fn navigation_reports_the_page_actually_entered() {
    let mut s = ReaderSession::new(ReaderConfig::default());
    s.load_manifest(sparse_keys(&[1, 2, 5]));
    assert_eq!(
        s.available_pages(),
        &[PageNumber(1), PageNumber(2), PageNumber(5)]
    );

    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 0),
        NavOutcome::Moved(PageNumber(2))
    );
    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 1_000),
        NavOutcome::Moved(PageNumber(1))
    );
    assert_eq!(s.current_page(), PageNumber(1));
}

#[test]
fn navigation_that_falls_back_in_place_keeps_the_cooldown_open() {
    let mut s = ReaderSession::new(ReaderConfig::default());
    s.load_manifest(sparse_keys(&[1, 5]));

    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 0),
        NavOutcome::Unchanged
    );
    assert_eq!(s.current_page(), PageNumber(1));
    assert_eq!(
        s.navigate(&NavInput::key("ArrowRight"), 100),
        NavOutcome::Unchanged
    );
}
