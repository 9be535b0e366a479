use serde_json::json;

use super::*;
use crate::reader::{config::ReaderConfig, machine::ZoomPatch};

fn machine() -> ReaderStateMachine {
    ReaderStateMachine::new(&ReaderConfig::default())
}

#[test]
fn parses_wire_names() {
    assert_eq!(
        parse_command(&json!({"type": "SET_MODE", "mode": "quiet"})),
        PlaybackCommand::SetMode {
            mode: ReaderMode::Quiet
        }
    );
    assert_eq!(
        parse_command(&json!({"type": "PLAY_HOTSPOT", "hotspotId": "h1"})),
        PlaybackCommand::PlayHotspot {
            hotspot_id: "h1".to_string()
        }
    );
    assert_eq!(
        parse_command(&json!({"type": "STOP_PLAYBACK"})),
        PlaybackCommand::StopPlayback
    );
}

#[test]
fn unknown_and_malformed_commands_are_noops() {
    let mut m = machine();
    for raw in [
        json!({"type": "SEEK", "toMs": 10}),
        json!({"type": "PLAY_HOTSPOT"}),
        json!({"kind": "STOP_PLAYBACK"}),
        json!(42),
    ] {
        let cmd = parse_command(&raw);
        assert_eq!(cmd, PlaybackCommand::Unknown);
        assert!(!dispatch_command(&mut m, &cmd));
    }
    assert_eq!(m.revision(), 0);
}

#[test]
fn quiet_mode_forces_autoplay_off() {
    let mut m = machine();
    m.toggle_autoplay(Some(true));
    dispatch_command(
        &mut m,
        &PlaybackCommand::SetMode {
            mode: ReaderMode::Quiet,
        },
    );
    assert_eq!(m.state().playback.mode, ReaderMode::Quiet);
    assert!(!m.state().settings.autoplay_enabled);

    m.toggle_autoplay(Some(true));
    dispatch_command(
        &mut m,
        &PlaybackCommand::SetMode {
            mode: ReaderMode::Standard,
        },
    );
    assert!(m.state().settings.autoplay_enabled);
}

#[test]
fn goto_marks_read_and_selects() {
    let mut m = machine();
    let cmd = PlaybackCommand::GotoHotspot {
        hotspot_id: "h7".to_string(),
    };
    assert_eq!(cmd.hotspot_id(), Some("h7"));
    dispatch_command(&mut m, &cmd);
    assert!(m.state().is_read("h7"));
    assert_eq!(m.state().playback.phase, PlaybackPhase::Idle);
    assert_eq!(m.state().playback.active_hotspot_id.as_deref(), Some("h7"));
    assert_eq!(m.revision(), 1);
}

#[test]
fn play_pause_resume_cycle() {
    let mut m = machine();
    dispatch_command(
        &mut m,
        &PlaybackCommand::PlayHotspot {
            hotspot_id: "h1".to_string(),
        },
    );
    assert_eq!(m.state().playback.phase, PlaybackPhase::Loading);
    assert!(!m.state().is_read("h1"));

    dispatch_command(&mut m, &PlaybackCommand::PausePlayback);
    assert_eq!(m.state().playback.phase, PlaybackPhase::Paused);
    dispatch_command(&mut m, &PlaybackCommand::ResumePlayback);
    assert_eq!(m.state().playback.phase, PlaybackPhase::Playing);
}

#[test]
fn stop_resets_playback_and_zoom_animation_but_keeps_mode() {
    let mut m = machine();
    dispatch_command(
        &mut m,
        &PlaybackCommand::SetMode {
            mode: ReaderMode::Quiet,
        },
    );
    dispatch_command(
        &mut m,
        &PlaybackCommand::PlayHotspot {
            hotspot_id: "h1".to_string(),
        },
    );
    m.set_zoom_target(ZoomPatch {
        target_scale: Some(2.5),
        is_animating: Some(true),
        ..ZoomPatch::default()
    });

    let before = m.revision();
    dispatch_command(&mut m, &PlaybackCommand::StopPlayback);
    assert_eq!(m.revision(), before + 1);
    assert_eq!(m.state().playback.phase, PlaybackPhase::Idle);
    assert_eq!(m.state().playback.active_hotspot_id, None);
    assert!(!m.state().zoom.is_animating);
    assert_eq!(m.state().playback.mode, ReaderMode::Quiet);
}
