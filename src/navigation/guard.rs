use crate::foundation::core::PageNumber;

/// Minimum spacing between two accepted navigations.
pub const DEFAULT_COOLDOWN_MS: u64 = 500;

/// Direction of a single page step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavDirection {
    /// Towards page 1.
    Previous,
    /// Towards the last page.
    Next,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Closed set of navigation intents every raw input is reduced to.
pub enum NavCommand {
    /// One page back.
    Previous,
    /// One page forward.
    Next,
    /// The first available page.
    First,
    /// The last available page.
    Last,
}

/// Step one page in `direction` over an ascending page list.
///
/// Unknown `current` pages resolve to the first page; both boundaries are sticky. An empty
/// list leaves `current` unchanged.
pub fn step(current: PageNumber, pages: &[PageNumber], direction: NavDirection) -> PageNumber {
    let Some(&first) = pages.first() else {
        return current;
    };
    let Some(index) = pages.iter().position(|p| *p == current) else {
        return first;
    };
    match direction {
        NavDirection::Previous if index == 0 => first,
        NavDirection::Previous => pages[index - 1],
        NavDirection::Next => pages[(index + 1).min(pages.len() - 1)],
    }
}

/// First available page, or `current` when there are none.
pub fn jump_to_first(current: PageNumber, pages: &[PageNumber]) -> PageNumber {
    pages.first().copied().unwrap_or(current)
}

/// Last available page, or `current` when there are none.
pub fn jump_to_last(current: PageNumber, pages: &[PageNumber]) -> PageNumber {
    pages.last().copied().unwrap_or(current)
}

/// Target page for `command`; total over every input.
pub fn resolve(current: PageNumber, pages: &[PageNumber], command: NavCommand) -> PageNumber {
    match command {
        NavCommand::Previous => step(current, pages, NavDirection::Previous),
        NavCommand::Next => step(current, pages, NavDirection::Next),
        NavCommand::First => jump_to_first(current, pages),
        NavCommand::Last => jump_to_last(current, pages),
    }
}

/// Cooldown gate: accept when nothing was accepted yet or `cooldown_ms` has elapsed.
pub fn should_accept_navigation(
    now_ms: u64,
    last_accepted_at: Option<u64>,
    cooldown_ms: u64,
) -> bool {
    match last_accepted_at {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Result of offering one navigation input to the guard.
pub enum NavOutcome {
    /// The page changes to the contained value.
    Moved(PageNumber),
    /// Accepted by both gates but already at the target (boundary no-op).
    Unchanged,
    /// Dropped: synthetic auto-repeat input.
    RejectedRepeat,
    /// Dropped: inside the cooldown window.
    RejectedCooldown,
}

impl NavOutcome {
    /// Target page, for [`NavOutcome::Moved`].
    pub fn page(self) -> Option<PageNumber> {
        match self {
            Self::Moved(p) => Some(p),
            _ => None,
        }
    }
}

/// Debounced page stepping.
///
/// Repeat suppression and the cooldown are independent gates; a rejected input leaves the
/// guard untouched, and so does a navigation that would not change the page.
#[derive(Clone, Debug)]
pub struct NavigationGuard {
    cooldown_ms: u64,
    last_accepted_at: Option<u64>,
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_MS)
    }
}

impl NavigationGuard {
    /// Guard enforcing `cooldown_ms` between accepted moves.
    pub fn new(cooldown_ms: u64) -> Self {
        Self {
            cooldown_ms,
            last_accepted_at: None,
        }
    }

    /// Configured cooldown.
    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    /// Timestamp of the last move that changed the page.
    pub fn last_accepted_at(&self) -> Option<u64> {
        self.last_accepted_at
    }

    /// Run `command` through both gates and resolve its target page.
    pub fn offer(
        &mut self,
        command: NavCommand,
        repeat: bool,
        now_ms: u64,
        current: PageNumber,
        pages: &[PageNumber],
    ) -> NavOutcome {
        if repeat {
            return NavOutcome::RejectedRepeat;
        }
        if !should_accept_navigation(now_ms, self.last_accepted_at, self.cooldown_ms) {
            return NavOutcome::RejectedCooldown;
        }
        let next = resolve(current, pages, command);
        if next == current {
            return NavOutcome::Unchanged;
        }
        self.last_accepted_at = Some(now_ms);
        NavOutcome::Moved(next)
    }

    /// Restore an earlier `last_accepted_at`, undoing an accepted move that did not land.
    pub fn rewind(&mut self, last_accepted_at: Option<u64>) {
        self.last_accepted_at = last_accepted_at;
    }

    /// Forget the last accepted timestamp, e.g. after a new manifest is loaded.
    pub fn reset(&mut self) {
        self.last_accepted_at = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/navigation/guard.rs"]
mod tests;
