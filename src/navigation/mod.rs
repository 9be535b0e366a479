//! Page navigation: a closed command set fed through repeat and cooldown gates.

/// Stepping, jumps and the [`guard::NavigationGuard`] gates.
pub mod guard;
/// Raw key/click input to [`guard::NavCommand`].
pub mod input;
