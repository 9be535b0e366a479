use super::*;

fn pages(n: u32) -> Vec<PageNumber> {
    (1..=n).map(PageNumber).collect()
}

#[test]
fn step_is_sticky_at_boundaries() {
    assert_eq!(step(PageNumber(5), &pages(5), NavDirection::Next), PageNumber(5));
    assert_eq!(step(PageNumber(1), &pages(3), NavDirection::Previous), PageNumber(1));
    assert_eq!(step(PageNumber(2), &pages(3), NavDirection::Next), PageNumber(3));
    assert_eq!(step(PageNumber(2), &pages(3), NavDirection::Previous), PageNumber(1));
}

#[test]
fn step_over_sparse_pages_and_unknown_current() {
    let sparse = [PageNumber(2), PageNumber(5), PageNumber(9)];
    assert_eq!(step(PageNumber(5), &sparse, NavDirection::Next), PageNumber(9));
    assert_eq!(step(PageNumber(5), &sparse, NavDirection::Previous), PageNumber(2));
    assert_eq!(step(PageNumber(7), &sparse, NavDirection::Next), PageNumber(2));
    assert_eq!(step(PageNumber(7), &sparse, NavDirection::Previous), PageNumber(2));
    assert_eq!(step(PageNumber(7), &[], NavDirection::Next), PageNumber(7));
}

#[test]
fn jumps_return_boundaries() {
    let p = pages(4);
    assert_eq!(jump_to_first(PageNumber(3), &p), PageNumber(1));
    assert_eq!(jump_to_last(PageNumber(3), &p), PageNumber(4));
    assert_eq!(jump_to_last(PageNumber(3), &[]), PageNumber(3));
    assert_eq!(resolve(PageNumber(4), &p, NavCommand::Last), PageNumber(4));
}

#[test]
fn cooldown_gate() {
    assert!(should_accept_navigation(0, None, 500));
    assert!(should_accept_navigation(1_000, None, 500));
    assert!(!should_accept_navigation(1_100, Some(1_000), 500));
    assert!(should_accept_navigation(1_600, Some(1_000), 500));
    assert!(should_accept_navigation(1_500, Some(1_000), 500));
    assert!(!should_accept_navigation(900, Some(1_000), 500));
}

#[test]
fn guard_rejections_leave_timestamp_untouched() {
    let p = pages(10);
    let mut guard = NavigationGuard::default();

    let first = guard.offer(NavCommand::Next, false, 1_000, PageNumber(1), &p);
    assert_eq!(first, NavOutcome::Moved(PageNumber(2)));
    assert_eq!(guard.last_accepted_at(), Some(1_000));

    let second = guard.offer(NavCommand::Next, false, 1_100, PageNumber(2), &p);
    assert_eq!(second, NavOutcome::RejectedCooldown);
    assert_eq!(guard.last_accepted_at(), Some(1_000));

    let third = guard.offer(NavCommand::Next, false, 1_600, PageNumber(2), &p);
    assert_eq!(third.page(), Some(PageNumber(3)));
    assert_eq!(guard.last_accepted_at(), Some(1_600));
}

#[test]
fn repeats_are_rejected_even_after_cooldown() {
    let p = pages(3);
    let mut guard = NavigationGuard::new(500);
    assert_eq!(
        guard.offer(NavCommand::Next, true, 10_000, PageNumber(1), &p),
        NavOutcome::RejectedRepeat
    );
    assert_eq!(guard.last_accepted_at(), None);
}

#[test]
fn boundary_noop_does_not_start_cooldown() {
    let p = pages(3);
    let mut guard = NavigationGuard::new(500);
    assert_eq!(
        guard.offer(NavCommand::Previous, false, 1_000, PageNumber(1), &p),
        NavOutcome::Unchanged
    );
    assert_eq!(guard.last_accepted_at(), None);
    assert_eq!(
        guard.offer(NavCommand::Next, false, 1_050, PageNumber(1), &p),
        NavOutcome::Moved(PageNumber(2))
    );
    guard.reset();
    assert_eq!(guard.last_accepted_at(), None);
}

#[test]
fn rewind_restores_the_previous_timestamp() {
    let mut guard = NavigationGuard::new(500);
    let p = pages(3);
    assert_eq!(
        guard.offer(NavCommand::Next, false, 1_000, PageNumber(1), &p),
        NavOutcome::Moved(PageNumber(2))
    );
    guard.rewind(None);
    assert_eq!(guard.last_accepted_at(), None);
    assert_eq!(
        guard.offer(NavCommand::Next, false, 1_100, PageNumber(2), &p),
        NavOutcome::Moved(PageNumber(3))
    );
}
