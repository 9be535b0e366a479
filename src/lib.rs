//! Pagespot is the coordination core of an illustrated, hotspot-driven picture-book reader.
//!
//! It turns an author-supplied manifest into a dense page sequence and drives everything a
//! renderer needs to draw and react to a page, without doing any rendering itself.
//!
//! # Overview
//!
//! 1. **Normalize**: `ManifestDef -> Vec<NormalizedPage>` (gaps become placeholder pages with
//!    inferred image names)
//! 2. **Geometry**: hotspot polygons -> centroid, outline string, hit tests
//! 3. **View**: `image size + focal point + zoom factor -> Viewport` (always inside the image)
//!    plus spotlight mask stops
//! 4. **Navigate**: keys and clicks -> `NavCommand` -> repeat/cooldown gates -> page step
//! 5. **State**: a serializable [`ReaderState`] changed only through [`ReaderAction`]s and
//!    external [`PlaybackCommand`]s, with read-state and settings persisted per session
//!
//! [`ReaderSession`] composes all of the above for one loaded manifest.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Total**: geometry, navigation and state transitions never fail; only manifest and
//!   configuration boundaries return [`PagespotError`].
//! - **No clocks, no IO in the core**: timestamps are supplied by the caller, and manifest
//!   transport is external (see [`ManifestLoader`]).
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Hotspot polygon geometry.
pub mod geometry;
/// Manifest model, normalization, loading and asset paths.
pub mod manifest;
/// Navigation commands and gates.
pub mod navigation;
/// Reader state machine, commands, persistence and session.
pub mod reader;
/// Zoom viewport derivation.
pub mod view;

pub use foundation::core::{ImageSize, PageNumber, Point, Rect, Size, Vec2};
pub use foundation::error::{PagespotError, PagespotResult};

pub use geometry::polygon::{
    DEFAULT_SHRINK_FACTOR, bounding_box, centroid, hit_test, shrink_toward_centroid,
    to_coordinate_string,
};
pub use manifest::assets::{AssetCategory, AssetResolver, AssetResolverConfig};
pub use manifest::loader::{
    LoadState, LoadTicket, ManifestLoader, load_manifest_file, parse_manifest,
};
pub use manifest::model::{
    AudioContentDef, AvatarDef, ContentDef, HotspotDef, ManifestDef, PageDef, PointDef,
    SubtitleDef,
};
pub use manifest::normalize::{
    AudioContent, ContentKind, Hotspot, NormalizedPage, PlaylistItem, SubtitleTrack,
    available_pages, infer_page_image_file_name, manifest_page, normalize, page_count,
};
pub use navigation::guard::{
    NavCommand, NavDirection, NavOutcome, NavigationGuard, jump_to_first, jump_to_last,
    should_accept_navigation, step,
};
pub use navigation::input::{NavInput, command_for_click, command_for_key};
pub use reader::command::{PlaybackCommand, command_actions, dispatch_command, parse_command};
pub use reader::config::ReaderConfig;
pub use reader::machine::{
    PlaybackPhaseUpdate, ReaderAction, ReaderStateMachine, ScheduleHandle, ScheduledClear,
    SubscriptionId, ZoomPatch, reduce,
};
pub use reader::persist::{JsonFileStore, MemoryStore, PersistedSession, SessionStore};
pub use reader::session::ReaderSession;
pub use reader::state::{
    FeatureFlags, FeatureFlagsPatch, PlaybackPhase, PlaybackState, ReadState, ReaderMode,
    ReaderSettings, ReaderState, ZoomState,
};
pub use view::zoom::{
    SpotlightStops, Viewport, ZoomSelection, compute_spotlight_stops, compute_viewport,
    full_viewport, toggle_zoom,
};
