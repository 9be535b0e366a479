use crate::{
    foundation::{core::Point, math::clamp_f64},
    manifest::normalize::PlaylistItem,
    reader::{
        config::ReaderConfig,
        persist::{PersistedSession, SessionStore, restore_state},
        state::{
            FeatureFlagsPatch, MIN_ZOOM_SCALE, PlaybackPhase, PlaybackState, ReaderMode,
            ReaderState,
        },
    },
};

#[derive(Clone, Debug, Default, PartialEq)]
/// Payload for [`ReaderAction::SetPlaybackPhase`].
///
/// Every field except `queue` overwrites the current value, so omitted ids are cleared.
/// `queue: None` keeps the current queue.
pub struct PlaybackPhaseUpdate {
    /// New phase.
    pub phase: PlaybackPhase,
    /// Active hotspot; `None` clears it.
    pub active_hotspot_id: Option<String>,
    /// Active playlist item; `None` clears it.
    pub active_item_id: Option<String>,
    /// Replacement queue, if any.
    pub queue: Option<Vec<PlaylistItem>>,
    /// Error message; `None` clears it.
    pub error: Option<String>,
}

impl PlaybackPhaseUpdate {
    /// Update to `phase` with every optional field cleared.
    pub fn new(phase: PlaybackPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }

    /// Set the active hotspot.
    pub fn with_hotspot(mut self, hotspot_id: impl Into<String>) -> Self {
        self.active_hotspot_id = Some(hotspot_id.into());
        self
    }

    /// Set the active playlist item.
    pub fn with_item(mut self, item_id: impl Into<String>) -> Self {
        self.active_item_id = Some(item_id.into());
        self
    }

    /// Replace the queue.
    pub fn with_queue(mut self, queue: Vec<PlaylistItem>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Attach an error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Partial zoom update. `focal_point: Some(None)` clears the focal point.
pub struct ZoomPatch {
    /// Current scale.
    pub scale: Option<f64>,
    /// Scale being animated towards.
    pub target_scale: Option<f64>,
    /// Animation flag.
    pub is_animating: Option<bool>,
    /// Focal point.
    pub focal_point: Option<Option<Point>>,
}

#[derive(Clone, Debug, PartialEq)]
/// Every transition the reader state accepts.
pub enum ReaderAction {
    /// Change the reading mode.
    SetPlaybackMode(ReaderMode),
    /// Overwrite the playback phase.
    SetPlaybackPhase(PlaybackPhaseUpdate),
    /// Reset playback to defaults, keeping the mode.
    ClearPlayback,
    /// Merge a zoom update.
    SetZoomTarget(ZoomPatch),
    /// Stop animating; optionally settle both scales on a value.
    EndZoomAnimation(Option<f64>),
    /// Record a hotspot as read.
    MarkHotspotRead(String),
    /// Forget all read hotspots.
    ResetHotspotReads,
    /// Set, or flip when `None`.
    ToggleSubtitles(Option<bool>),
    /// Set, or flip when `None`.
    ToggleAutoplay(Option<bool>),
    /// Merge feature flags.
    PatchFeatureFlags(FeatureFlagsPatch),
}

/// Pure transition function. Scales are clamped to `[1, max_zoom_scale]`.
pub fn reduce(state: &ReaderState, action: &ReaderAction, max_zoom_scale: f64) -> ReaderState {
    let clamp_scale = |v: f64| clamp_f64(v, MIN_ZOOM_SCALE, max_zoom_scale);
    let mut next = state.clone();
    match action {
        ReaderAction::SetPlaybackMode(mode) => next.playback.mode = *mode,
        ReaderAction::SetPlaybackPhase(update) => {
            let playback = &mut next.playback;
            playback.phase = update.phase;
            playback.active_hotspot_id = update.active_hotspot_id.clone();
            playback.active_item_id = update.active_item_id.clone();
            playback.error = update.error.clone();
            if let Some(queue) = &update.queue {
                playback.queue = queue.clone();
            }
        }
        ReaderAction::ClearPlayback => {
            next.playback = PlaybackState {
                mode: state.playback.mode,
                ..PlaybackState::default()
            };
        }
        ReaderAction::SetZoomTarget(patch) => {
            let zoom = &mut next.zoom;
            if let Some(scale) = patch.scale {
                zoom.scale = clamp_scale(scale);
            }
            if let Some(target) = patch.target_scale {
                zoom.target_scale = clamp_scale(target);
            }
            if let Some(animating) = patch.is_animating {
                zoom.is_animating = animating;
            }
            if let Some(focal) = patch.focal_point {
                zoom.focal_point = focal;
            }
        }
        ReaderAction::EndZoomAnimation(scale) => {
            next.zoom.is_animating = false;
            if let Some(scale) = scale {
                let scale = clamp_scale(*scale);
                next.zoom.scale = scale;
                next.zoom.target_scale = scale;
            }
        }
        ReaderAction::MarkHotspotRead(id) => {
            next.read_state.insert(id.clone(), true);
        }
        ReaderAction::ResetHotspotReads => next.read_state.clear(),
        ReaderAction::ToggleSubtitles(enabled) => {
            next.settings.subtitles_enabled =
                enabled.unwrap_or(!state.settings.subtitles_enabled);
        }
        ReaderAction::ToggleAutoplay(enabled) => {
            next.settings.autoplay_enabled = enabled.unwrap_or(!state.settings.autoplay_enabled);
        }
        ReaderAction::PatchFeatureFlags(patch) => {
            next.feature_flags = state.feature_flags.merged(patch);
            if let Some(on) = patch.subtitle_default_on {
                next.settings.subtitles_enabled = on;
            }
        }
    }
    next
}

/// Handle for a registered state listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle for a scheduled active-hotspot clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleHandle(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
/// A pending "clear the active hotspot at `due_at_ms`" request.
pub struct ScheduledClear {
    /// Identifies this request.
    pub handle: ScheduleHandle,
    /// Time the clear fires at.
    pub due_at_ms: u64,
    /// Hotspot that must still be active.
    pub hotspot_id: String,
}

type Listener = Box<dyn FnMut(&ReaderState, u64)>;

/// Owns the reader state and applies transitions one at a time.
///
/// Each call to [`ReaderStateMachine::apply`] or [`ReaderStateMachine::apply_all`] is one
/// commit: listeners see only the final state, and the revision advances once. After a
/// commit that changed the read-state or settings, the record is written to the attached
/// store; write failures are logged and otherwise ignored.
pub struct ReaderStateMachine {
    state: ReaderState,
    revision: u64,
    max_zoom_scale: f64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    store: Option<Box<dyn SessionStore>>,
    schedule_generation: u64,
    scheduled: Option<ScheduledClear>,
}

impl std::fmt::Debug for ReaderStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderStateMachine")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("max_zoom_scale", &self.max_zoom_scale)
            .field("listeners", &self.listeners.len())
            .field("has_store", &self.store.is_some())
            .field("scheduled", &self.scheduled)
            .finish()
    }
}

impl ReaderStateMachine {
    /// Machine with default state for `config`, without persistence.
    pub fn new(config: &ReaderConfig) -> Self {
        Self::from_state(ReaderState::with_flags(config.feature_flags), config)
    }

    /// Start from the persisted session in `store`, which then receives later writes.
    pub fn with_store(config: &ReaderConfig, mut store: Box<dyn SessionStore>) -> Self {
        let state = restore_state(store.as_mut(), config.feature_flags);
        let mut machine = Self::from_state(state, config);
        machine.store = Some(store);
        machine
    }

    fn from_state(state: ReaderState, config: &ReaderConfig) -> Self {
        Self {
            state,
            revision: 0,
            max_zoom_scale: config.max_zoom_scale,
            listeners: Vec::new(),
            next_subscription: 0,
            store: None,
            schedule_generation: 0,
            scheduled: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> &ReaderState {
        &self.state
    }

    /// Number of committed, state-changing transitions so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Upper zoom bound applied by [`reduce`].
    pub fn max_zoom_scale(&self) -> f64 {
        self.max_zoom_scale
    }

    /// Register a listener called after every committed change with the new revision.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ReaderState, u64) + 'static,
    ) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Apply one transition. Returns whether the state changed.
    pub fn apply(&mut self, action: ReaderAction) -> bool {
        self.apply_all([action])
    }

    /// Apply several transitions as a single commit.
    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = ReaderAction>) -> bool {
        let mut next = self.state.clone();
        for action in actions {
            tracing::trace!(?action, "reduce");
            next = reduce(&next, &action, self.max_zoom_scale);
        }
        self.commit(next)
    }

    fn commit(&mut self, next: ReaderState) -> bool {
        if next == self.state {
            return false;
        }
        let persist = next.read_state != self.state.read_state
            || next.settings != self.state.settings;
        self.state = next;
        self.revision += 1;

        if let Some(pending) = &self.scheduled
            && self.state.playback.active_hotspot_id.as_deref()
                != Some(pending.hotspot_id.as_str())
        {
            tracing::debug!(hotspot = %pending.hotspot_id, "scheduled clear superseded");
            self.scheduled = None;
        }
        if persist {
            self.persist();
        }
        for (_, listener) in &mut self.listeners {
            listener(&self.state, self.revision);
        }
        true
    }

    fn persist(&mut self) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        let record = PersistedSession::from_state(&self.state);
        if let Err(err) = store.save(&record) {
            tracing::warn!(error = %err, "session write failed; continuing");
        }
    }

    /// Commit [`ReaderAction::SetPlaybackMode`].
    pub fn set_playback_mode(&mut self, mode: ReaderMode) -> bool {
        self.apply(ReaderAction::SetPlaybackMode(mode))
    }

    /// Commit [`ReaderAction::SetPlaybackPhase`].
    pub fn set_playback_phase(&mut self, update: PlaybackPhaseUpdate) -> bool {
        self.apply(ReaderAction::SetPlaybackPhase(update))
    }

    /// Commit [`ReaderAction::ClearPlayback`].
    pub fn clear_playback(&mut self) -> bool {
        self.apply(ReaderAction::ClearPlayback)
    }

    /// Commit [`ReaderAction::SetZoomTarget`].
    pub fn set_zoom_target(&mut self, patch: ZoomPatch) -> bool {
        self.apply(ReaderAction::SetZoomTarget(patch))
    }

    /// Commit [`ReaderAction::EndZoomAnimation`].
    pub fn end_zoom_animation(&mut self, scale: Option<f64>) -> bool {
        self.apply(ReaderAction::EndZoomAnimation(scale))
    }

    /// Commit [`ReaderAction::MarkHotspotRead`].
    pub fn mark_hotspot_read(&mut self, hotspot_id: impl Into<String>) -> bool {
        self.apply(ReaderAction::MarkHotspotRead(hotspot_id.into()))
    }

    /// Commit [`ReaderAction::ResetHotspotReads`].
    pub fn reset_hotspot_reads(&mut self) -> bool {
        self.apply(ReaderAction::ResetHotspotReads)
    }

    /// Commit [`ReaderAction::ToggleSubtitles`].
    pub fn toggle_subtitles(&mut self, enabled: Option<bool>) -> bool {
        self.apply(ReaderAction::ToggleSubtitles(enabled))
    }

    /// Commit [`ReaderAction::ToggleAutoplay`].
    pub fn toggle_autoplay(&mut self, enabled: Option<bool>) -> bool {
        self.apply(ReaderAction::ToggleAutoplay(enabled))
    }

    /// Commit [`ReaderAction::PatchFeatureFlags`].
    pub fn patch_feature_flags(&mut self, patch: FeatureFlagsPatch) -> bool {
        self.apply(ReaderAction::PatchFeatureFlags(patch))
    }

    /// Request that `hotspot_id` stops being active once `now_ms + delay_ms` is reached.
    ///
    /// Replaces any earlier request. The request is dropped as soon as a commit makes a
    /// different hotspot (or none) active.
    pub fn schedule_clear_active(
        &mut self,
        hotspot_id: impl Into<String>,
        now_ms: u64,
        delay_ms: u64,
    ) -> ScheduleHandle {
        self.schedule_generation += 1;
        let handle = ScheduleHandle(self.schedule_generation);
        self.scheduled = Some(ScheduledClear {
            handle,
            due_at_ms: now_ms.saturating_add(delay_ms),
            hotspot_id: hotspot_id.into(),
        });
        handle
    }

    /// Pending clear request.
    pub fn scheduled(&self) -> Option<&ScheduledClear> {
        self.scheduled.as_ref()
    }

    /// Whether `handle` is still pending.
    pub fn is_scheduled(&self, handle: ScheduleHandle) -> bool {
        self.scheduled.as_ref().is_some_and(|s| s.handle == handle)
    }

    /// Drop the pending clear request.
    pub fn cancel_scheduled(&mut self) {
        if let Some(pending) = self.scheduled.take() {
            tracing::debug!(hotspot = %pending.hotspot_id, "scheduled clear cancelled");
        }
    }

    /// Fire the scheduled clear if it is due. Returns whether the state changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match &self.scheduled {
            Some(pending) if now_ms >= pending.due_at_ms => {}
            _ => return false,
        }
        let Some(pending) = self.scheduled.take() else {
            return false;
        };
        if self.state.playback.active_hotspot_id.as_deref() != Some(pending.hotspot_id.as_str()) {
            return false;
        }
        self.clear_playback()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/machine.rs"]
mod tests;
