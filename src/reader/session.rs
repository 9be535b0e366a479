use std::sync::Arc;

use crate::{
    foundation::{
        core::{ImageSize, PageNumber, Point},
        error::PagespotResult,
        math::clamp_f64,
    },
    geometry::polygon::{self, DEFAULT_SHRINK_FACTOR},
    manifest::{
        assets::AssetResolver,
        loader::{LoadState, LoadTicket, ManifestLoader},
        model::ManifestDef,
        normalize::{self, Hotspot, NormalizedPage},
    },
    navigation::{
        guard::{NavOutcome, NavigationGuard},
        input::NavInput,
    },
    reader::{
        command::{PlaybackCommand, dispatch_command},
        config::ReaderConfig,
        machine::{
            PlaybackPhaseUpdate, ReaderAction, ReaderStateMachine, SubscriptionId, ZoomPatch,
        },
        persist::SessionStore,
        state::{MIN_ZOOM_SCALE, PlaybackPhase, ReaderState, ZoomState},
    },
    view::zoom::{
        SpotlightStops, Viewport, ZoomSelection, compute_spotlight_stops, full_viewport,
        toggle_zoom,
    },
};

/// A reader bound to one manifest: pages, navigation, selection, zoom and playback state.
///
/// All inputs carry a caller-supplied monotonic timestamp in milliseconds; the session
/// never reads a clock. The active hotspot, when set, always belongs to the active page.
#[derive(Debug)]
pub struct ReaderSession {
    config: ReaderConfig,
    machine: ReaderStateMachine,
    loader: ManifestLoader,
    manifest: Option<Arc<ManifestDef>>,
    pages: Vec<NormalizedPage>,
    available: Vec<PageNumber>,
    current: PageNumber,
    active_page: Option<NormalizedPage>,
    guard: NavigationGuard,
    image_size: Option<ImageSize>,
    zoom: Option<ZoomSelection>,
    hotspots_visible: bool,
    assets: AssetResolver,
}

impl ReaderSession {
    /// Session without persistence.
    pub fn new(config: ReaderConfig) -> Self {
        let machine = ReaderStateMachine::new(&config);
        Self::with_machine(config, machine)
    }

    /// Session whose read-state and settings are restored from, and saved to, `store`.
    pub fn with_store(config: ReaderConfig, store: Box<dyn SessionStore>) -> Self {
        let machine = ReaderStateMachine::with_store(&config, store);
        Self::with_machine(config, machine)
    }

    fn with_machine(config: ReaderConfig, machine: ReaderStateMachine) -> Self {
        Self {
            guard: NavigationGuard::new(config.navigation_cooldown_ms),
            assets: AssetResolver::new(config.assets.clone(), None),
            config,
            machine,
            loader: ManifestLoader::new(),
            manifest: None,
            pages: Vec::new(),
            available: Vec::new(),
            current: PageNumber::FIRST,
            active_page: None,
            image_size: None,
            zoom: None,
            hotspots_visible: true,
        }
    }

    /// Runtime configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Current reader state.
    pub fn state(&self) -> &ReaderState {
        self.machine.state()
    }

    /// Underlying state machine.
    pub fn machine(&self) -> &ReaderStateMachine {
        &self.machine
    }

    /// Register a state listener.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ReaderState, u64) + 'static,
    ) -> SubscriptionId {
        self.machine.subscribe(listener)
    }

    /// Remove a state listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.machine.unsubscribe(id)
    }

    // ---- manifest ----

    /// Start a manifest load. Any earlier in-flight load is superseded.
    pub fn begin_manifest_load(&mut self) -> LoadTicket {
        self.loader.begin()
    }

    /// Hand back the outcome of a load started with [`Self::begin_manifest_load`].
    ///
    /// Stale tickets are ignored and return `false`. A failure drops the current manifest
    /// and surfaces the message as the playback error.
    #[tracing::instrument(skip(self, outcome))]
    pub fn complete_manifest_load(
        &mut self,
        ticket: LoadTicket,
        outcome: PagespotResult<ManifestDef>,
    ) -> bool {
        if !self.loader.complete(ticket, outcome) {
            return false;
        }
        match self.loader.state().clone() {
            LoadState::Ready(manifest) => self.install_manifest(manifest),
            LoadState::Failed(message) => {
                self.drop_manifest();
                self.machine.set_playback_phase(
                    PlaybackPhaseUpdate::new(PlaybackPhase::Error).with_error(message),
                );
            }
            LoadState::Idle | LoadState::Loading => {}
        }
        true
    }

    /// Install an already-available manifest.
    pub fn load_manifest(&mut self, manifest: ManifestDef) {
        let ticket = self.begin_manifest_load();
        self.complete_manifest_load(ticket, Ok(manifest));
    }

    /// Manifest load lifecycle.
    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    /// Cancel the in-flight manifest load.
    pub fn cancel_manifest_load(&mut self) {
        self.loader.cancel();
    }

    fn install_manifest(&mut self, manifest: Arc<ManifestDef>) {
        self.pages = normalize::normalize(&manifest);
        self.available = normalize::available_pages(&manifest);
        self.assets = AssetResolver::new(self.config.assets.clone(), Some(&manifest));
        self.manifest = Some(manifest);
        self.guard.reset();
        if self.machine.state().playback.phase == PlaybackPhase::Error {
            self.machine.clear_playback();
        }
        let current = if self.available.contains(&self.current) {
            self.current
        } else {
            self.available.first().copied().unwrap_or(PageNumber::FIRST)
        };
        tracing::debug!(pages = self.pages.len(), %current, "manifest installed");
        self.active_page = None;
        self.enter_page(current);
    }

    fn drop_manifest(&mut self) {
        self.manifest = None;
        self.pages.clear();
        self.available.clear();
        self.active_page = None;
        self.image_size = None;
        self.zoom = None;
        self.machine.cancel_scheduled();
    }

    /// Installed manifest, if any.
    pub fn manifest(&self) -> Option<&ManifestDef> {
        self.manifest.as_deref()
    }

    // ---- pages & navigation ----

    /// Normalized pages, one per page number up to the page count.
    pub fn pages(&self) -> &[NormalizedPage] {
        &self.pages
    }

    /// Page numbers navigation steps over.
    pub fn available_pages(&self) -> &[PageNumber] {
        &self.available
    }

    /// Page navigation is positioned on.
    pub fn current_page(&self) -> PageNumber {
        self.current
    }

    /// The page on screen: the current page, else page 1, else nothing.
    pub fn active_page(&self) -> Option<&NormalizedPage> {
        self.active_page.as_ref()
    }

    /// Resolver for the installed manifest's assets.
    pub fn asset_resolver(&self) -> &AssetResolver {
        &self.assets
    }

    /// Resolved URL of the active page's image.
    pub fn page_image_url(&self) -> Option<String> {
        self.active_page
            .as_ref()
            .map(|p| self.assets.page_image(&p.page_image))
    }

    /// Feed one raw navigation input through the repeat and cooldown gates.
    #[tracing::instrument(skip(self))]
    pub fn navigate(&mut self, input: &NavInput, now_ms: u64) -> NavOutcome {
        let Some(command) = input.to_command(self.current, &self.available) else {
            return NavOutcome::Unchanged;
        };
        let before = self.current;
        let last_accepted_at = self.guard.last_accepted_at();
        let outcome = self
            .guard
            .offer(command, input.is_repeat(), now_ms, before, &self.available);
        match outcome {
            NavOutcome::Moved(page) => {
                self.enter_page(page);
                if self.current == before {
                    tracing::debug!(
                        requested = %page,
                        "navigation fell back to the current page"
                    );
                    self.guard.rewind(last_accepted_at);
                    return NavOutcome::Unchanged;
                }
                NavOutcome::Moved(self.current)
            }
            NavOutcome::RejectedRepeat | NavOutcome::RejectedCooldown => {
                tracing::debug!(?outcome, "navigation input discarded");
                outcome
            }
            NavOutcome::Unchanged => outcome,
        }
    }

    fn enter_page(&mut self, requested: PageNumber) {
        let active = self.manifest.as_deref().and_then(|m| {
            normalize::manifest_page(m, requested)
                .or_else(|| normalize::manifest_page(m, PageNumber::FIRST))
        });
        let changed = active.as_ref().map(|p| p.page_number)
            != self.active_page.as_ref().map(|p| p.page_number);
        self.current = active.as_ref().map_or(requested, |p| p.page_number);
        self.active_page = active;
        if !changed {
            self.enforce_active_hotspot();
            return;
        }

        self.image_size = None;
        self.zoom = None;
        self.machine.cancel_scheduled();
        let mut actions = Vec::new();
        if self.machine.state().zoom != ZoomState::default() {
            actions.push(ReaderAction::SetZoomTarget(ZoomPatch {
                focal_point: Some(None),
                ..ZoomPatch::default()
            }));
            actions.push(ReaderAction::EndZoomAnimation(Some(MIN_ZOOM_SCALE)));
        }
        if self.dangling_active_hotspot() {
            actions.push(ReaderAction::ClearPlayback);
        }
        self.machine.apply_all(actions);
    }

    fn dangling_active_hotspot(&self) -> bool {
        match self.machine.state().playback.active_hotspot_id.as_deref() {
            Some(id) => {
                !self.hotspots_visible
                    || !self.active_page.as_ref().is_some_and(|p| p.has_hotspot(id))
            }
            None => false,
        }
    }

    fn enforce_active_hotspot(&mut self) {
        if self.dangling_active_hotspot() {
            tracing::debug!("clearing active hotspot absent from the active page");
            self.machine.clear_playback();
        }
        self.release_stale_zoom();
    }

    /// The zoom frames the active hotspot or nothing.
    fn release_stale_zoom(&mut self) {
        let active = self.machine.state().playback.active_hotspot_id.as_deref();
        let stale = self
            .zoom
            .as_ref()
            .is_some_and(|z| Some(z.hotspot_id.as_str()) != active);
        if !stale {
            return;
        }
        if let Some(released) = self.zoom.take() {
            tracing::debug!(hotspot = %released.hotspot_id, "zoom released with its selection");
        }
        self.machine.set_zoom_target(ZoomPatch {
            target_scale: Some(MIN_ZOOM_SCALE),
            is_animating: Some(true),
            focal_point: Some(None),
            ..ZoomPatch::default()
        });
    }

    // ---- image & zoom ----

    /// Record the decoded size of the active page's image. Unusable sizes are ignored.
    pub fn set_image_size(&mut self, size: ImageSize) {
        if size.is_usable() {
            self.image_size = Some(size);
        } else {
            tracing::debug!(?size, "ignoring unusable image size");
        }
    }

    /// Decoded image size, once known.
    pub fn image_size(&self) -> Option<ImageSize> {
        self.image_size
    }

    /// Hotspot the view is zoomed onto.
    pub fn zoom_selection(&self) -> Option<&ZoomSelection> {
        self.zoom.as_ref()
    }

    fn zoom_factor(&self) -> f64 {
        clamp_f64(
            self.machine.state().feature_flags.default_zoom_scale,
            MIN_ZOOM_SCALE,
            self.machine.max_zoom_scale(),
        )
    }

    /// Visible window of the page image; `None` until the image size is known.
    pub fn viewport(&self) -> Option<Viewport> {
        let image = self.image_size?;
        Some(match &self.zoom {
            Some(selection) => selection.viewport(image, self.zoom_factor()),
            None => full_viewport(image),
        })
    }

    /// `viewBox` string for [`Self::viewport`].
    pub fn view_box(&self) -> Option<String> {
        self.viewport().map(Viewport::to_view_box)
    }

    /// Spotlight mask stops, only while zoomed.
    pub fn spotlight(&self) -> Option<SpotlightStops> {
        self.zoom.as_ref()?;
        let image = self.image_size?;
        let viewport = self.viewport()?;
        Some(compute_spotlight_stops(viewport, image))
    }

    /// Renderer signal that the zoom animation has settled.
    pub fn finish_zoom_animation(&mut self) -> bool {
        let target = self.machine.state().zoom.target_scale;
        self.machine.end_zoom_animation(Some(target))
    }

    // ---- hotspots ----

    /// Whether hotspots are shown and selectable.
    pub fn hotspots_visible(&self) -> bool {
        self.hotspots_visible
    }

    /// Show or hide hotspots. Hiding clears the selection and the zoom.
    pub fn set_hotspots_visible(&mut self, visible: bool) {
        if self.hotspots_visible == visible {
            return;
        }
        self.hotspots_visible = visible;
        if visible {
            return;
        }
        self.machine.cancel_scheduled();
        let mut actions = Vec::new();
        if self.zoom.take().is_some() {
            actions.push(ReaderAction::SetZoomTarget(ZoomPatch {
                target_scale: Some(MIN_ZOOM_SCALE),
                is_animating: Some(true),
                focal_point: Some(None),
                ..ZoomPatch::default()
            }));
        }
        if self.machine.state().playback.active_hotspot_id.is_some() {
            actions.push(ReaderAction::ClearPlayback);
        }
        self.machine.apply_all(actions);
    }

    /// Flip hotspot visibility; returns the new value.
    pub fn toggle_hotspots(&mut self) -> bool {
        self.set_hotspots_visible(!self.hotspots_visible);
        self.hotspots_visible
    }

    /// Outline strings for the active page's hotspots, as `(id, "x,y x,y ...")`.
    pub fn hotspot_outlines(&self) -> Vec<(String, String)> {
        let Some(page) = &self.active_page else {
            return Vec::new();
        };
        page.hotspots
            .iter()
            .map(|h| {
                let shrunk = polygon::shrink_toward_centroid(&h.points, DEFAULT_SHRINK_FACTOR);
                (h.id.clone(), polygon::to_coordinate_string(&shrunk))
            })
            .collect()
    }

    /// Topmost visible hotspot containing `p` (image pixels).
    pub fn hotspot_at(&self, p: Point) -> Option<&Hotspot> {
        if !self.hotspots_visible {
            return None;
        }
        self.active_page
            .as_ref()?
            .hotspots
            .iter()
            .rev()
            .find(|h| polygon::hit_test(&h.points, p))
    }

    /// Select a hotspot on the active page.
    ///
    /// Marks it read, makes it active with its playlist queued and zooms onto it. Selecting
    /// the zoomed hotspot again zooms out and clears the selection once
    /// `clear_active_after_ms` has elapsed (see [`Self::tick`]). Returns `false` when the
    /// hotspot is hidden or not on the active page.
    #[tracing::instrument(skip(self))]
    pub fn select_hotspot(&mut self, hotspot_id: &str, now_ms: u64) -> bool {
        if !self.hotspots_visible {
            tracing::debug!("hotspots hidden; selection ignored");
            return false;
        }
        let Some(hotspot) = self.active_page.as_ref().and_then(|p| p.hotspot(hotspot_id)) else {
            tracing::debug!("hotspot not on active page");
            return false;
        };
        let hotspot = hotspot.clone();

        let previous = self.zoom.clone();
        let next = if self.machine.state().feature_flags.enable_auto_zoom {
            toggle_zoom(previous.clone(), &hotspot.id, &hotspot.points, self.image_size)
        } else {
            previous.clone()
        };
        self.zoom = next.clone();

        let zoomed_out =
            next.is_none() && previous.as_ref().is_some_and(|z| z.hotspot_id == hotspot.id);
        if zoomed_out {
            self.machine.set_zoom_target(ZoomPatch {
                target_scale: Some(MIN_ZOOM_SCALE),
                is_animating: Some(true),
                focal_point: Some(None),
                ..ZoomPatch::default()
            });
            self.machine
                .schedule_clear_active(hotspot.id, now_ms, self.config.clear_active_after_ms);
            return true;
        }

        self.machine.cancel_scheduled();
        let mut actions = vec![
            ReaderAction::MarkHotspotRead(hotspot.id.clone()),
            ReaderAction::SetPlaybackPhase(
                PlaybackPhaseUpdate::new(PlaybackPhase::Idle)
                    .with_hotspot(hotspot.id.as_str())
                    .with_queue(hotspot.playlist.clone()),
            ),
        ];
        if let Some(selection) = &next
            && next != previous
        {
            actions.push(ReaderAction::SetZoomTarget(ZoomPatch {
                target_scale: Some(self.zoom_factor()),
                is_animating: Some(true),
                focal_point: Some(Some(selection.focal)),
                ..ZoomPatch::default()
            }));
        }
        self.machine.apply_all(actions);
        self.release_stale_zoom();
        true
    }

    /// Fire any due timed transition. Returns whether the state changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let changed = self.machine.tick(now_ms);
        if changed {
            self.release_stale_zoom();
        }
        changed
    }

    // ---- state passthrough ----

    /// Apply a state transition, then drop an active hotspot that is not on the active page
    /// and any zoom that no longer frames the active hotspot.
    pub fn apply(&mut self, action: ReaderAction) -> bool {
        let changed = self.machine.apply(action);
        self.enforce_active_hotspot();
        changed
    }

    /// Dispatch an external playback command.
    ///
    /// Commands naming a hotspot on another page first move to that page, bypassing the
    /// navigation gates. Commands naming an unknown hotspot are ignored.
    #[tracing::instrument(skip(self))]
    pub fn dispatch(&mut self, command: &PlaybackCommand) -> bool {
        if let Some(id) = command.hotspot_id() {
            if !self.hotspots_visible {
                tracing::debug!(hotspot = id, "hotspots hidden; command ignored");
                return false;
            }
            let on_active = self.active_page.as_ref().is_some_and(|p| p.has_hotspot(id));
            if !on_active {
                let Some(page) = self
                    .pages
                    .iter()
                    .find(|p| p.has_hotspot(id))
                    .map(|p| p.page_number)
                else {
                    tracing::debug!(hotspot = id, "command names an unknown hotspot");
                    return false;
                };
                self.enter_page(page);
            }
        }
        let changed = dispatch_command(&mut self.machine, command);
        self.enforce_active_hotspot();
        changed
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reader/session.rs"]
mod tests;
