//! Reader state: the serializable record, its transitions, persistence and the session
//! that ties pages, selection and zoom together.

/// External playback command bridge.
pub mod command;
/// Runtime configuration.
pub mod config;
/// Pure reducer and the committing state machine.
pub mod machine;
/// Persisted subset of the state and storage backends.
pub mod persist;
/// Manifest-bound reader session.
pub mod session;
/// The reader state record.
pub mod state;
