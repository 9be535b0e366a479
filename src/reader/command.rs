use crate::reader::{
    machine::{PlaybackPhaseUpdate, ReaderAction, ReaderStateMachine},
    state::{PlaybackPhase, ReaderMode},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
/// External playback command, as sent by a remote control or orchestrator.
pub enum PlaybackCommand {
    /// Switch reading mode; quiet mode also turns autoplay off.
    SetMode {
        /// Requested mode.
        mode: ReaderMode,
    },
    /// Start loading a hotspot's playlist.
    PlayHotspot {
        /// Target hotspot.
        #[serde(rename = "hotspotId")]
        hotspot_id: String,
    },
    /// Jump to a hotspot without playing it, marking it read.
    GotoHotspot {
        /// Target hotspot.
        #[serde(rename = "hotspotId")]
        hotspot_id: String,
    },
    /// Pause; clears the active ids.
    PausePlayback,
    /// Resume; clears the active ids.
    ResumePlayback,
    /// Stop and reset playback, keeping the mode.
    StopPlayback,
    /// Any command kind this reader does not know. Dispatching it does nothing.
    #[serde(other)]
    Unknown,
}

impl PlaybackCommand {
    /// Hotspot the command refers to, if any.
    pub fn hotspot_id(&self) -> Option<&str> {
        match self {
            Self::PlayHotspot { hotspot_id } | Self::GotoHotspot { hotspot_id } => {
                Some(hotspot_id)
            }
            _ => None,
        }
    }
}

/// Decode a command from JSON. Anything malformed or unrecognized becomes
/// [`PlaybackCommand::Unknown`].
pub fn parse_command(value: &serde_json::Value) -> PlaybackCommand {
    match serde_json::from_value(value.clone()) {
        Ok(cmd) => cmd,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed playback command");
            PlaybackCommand::Unknown
        }
    }
}

/// Transitions a command expands to, in application order.
pub fn command_actions(command: &PlaybackCommand) -> Vec<ReaderAction> {
    match command {
        PlaybackCommand::SetMode { mode } => {
            let mut actions = vec![ReaderAction::SetPlaybackMode(*mode)];
            if *mode == ReaderMode::Quiet {
                actions.push(ReaderAction::ToggleAutoplay(Some(false)));
            }
            actions
        }
        PlaybackCommand::PlayHotspot { hotspot_id } => {
            vec![ReaderAction::SetPlaybackPhase(
                PlaybackPhaseUpdate::new(PlaybackPhase::Loading).with_hotspot(hotspot_id.as_str()),
            )]
        }
        PlaybackCommand::GotoHotspot { hotspot_id } => vec![
            ReaderAction::MarkHotspotRead(hotspot_id.clone()),
            ReaderAction::SetPlaybackPhase(
                PlaybackPhaseUpdate::new(PlaybackPhase::Idle).with_hotspot(hotspot_id.as_str()),
            ),
        ],
        PlaybackCommand::PausePlayback => vec![ReaderAction::SetPlaybackPhase(
            PlaybackPhaseUpdate::new(PlaybackPhase::Paused),
        )],
        PlaybackCommand::ResumePlayback => vec![ReaderAction::SetPlaybackPhase(
            PlaybackPhaseUpdate::new(PlaybackPhase::Playing),
        )],
        PlaybackCommand::StopPlayback => vec![
            ReaderAction::ClearPlayback,
            ReaderAction::EndZoomAnimation(None),
        ],
        PlaybackCommand::Unknown => Vec::new(),
    }
}

/// Apply a command as one commit. Returns whether the state changed.
#[tracing::instrument(skip(machine))]
pub fn dispatch_command(machine: &mut ReaderStateMachine, command: &PlaybackCommand) -> bool {
    let actions = command_actions(command);
    if actions.is_empty() {
        tracing::debug!("no-op playback command");
        return false;
    }
    machine.apply_all(actions)
}

#[cfg(test)]
#[path = "../../tests/unit/reader/command.rs"]
mod tests;
