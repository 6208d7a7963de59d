use std::sync::Arc;

use chrono::Duration;

use super::idle::IdleTracker;
use crate::test_utils::fixed_time;
use crate::MockClock;

#[test]
fn empty_shard_is_stamped_with_clock_time() {
    let tracker = IdleTracker::new(crate::test_utils::fixed_clock(fixed_time()));
    let mut idle_at = None;

    tracker.track(&mut idle_at, 0);

    assert_eq!(idle_at, Some(fixed_time()));
}

#[test]
fn existing_stamp_is_kept_while_empty() {
    // The clock must not be consulted when a stamp already exists
    let mut clock = MockClock::new();
    clock.expect_now().never();
    let tracker = IdleTracker::new(Arc::new(clock));
    let earlier = fixed_time() - Duration::minutes(5);
    let mut idle_at = Some(earlier);

    tracker.track(&mut idle_at, 0);

    assert_eq!(idle_at, Some(earlier));
}

#[test]
fn busy_shard_clears_stamp() {
    let mut clock = MockClock::new();
    clock.expect_now().never();
    let tracker = IdleTracker::new(Arc::new(clock));
    let mut idle_at = Some(fixed_time());

    tracker.track(&mut idle_at, 3);
    assert_eq!(idle_at, None);

    tracker.track(&mut idle_at, 1);
    assert_eq!(idle_at, None);
}
