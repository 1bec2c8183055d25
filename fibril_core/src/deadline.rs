// Copyright 2026 the Fibril Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Idle-time budgets.
//!
//! A [`Deadline`] reports how much of the current idle slice is left. The work
//! loop queries it once before each unit of work and yields once the answer
//! drops below [`SchedulerConfig::yield_threshold`](crate::scheduler::SchedulerConfig::yield_threshold).
//!
//! Browsers hand out one `IdleDeadline` per idle callback; native embedders and
//! tests use [`Unbounded`], [`Exhausted`], or [`SimulatedDeadline`].

use core::cell::Cell;

use crate::time::Duration;

/// Something that can report the time left in the current idle slice.
pub trait Deadline {
    /// Returns the time remaining before the slice ends.
    ///
    /// Successive calls within one slice should be non-increasing.
    fn time_remaining(&self) -> Duration;
}

impl<D: Deadline + ?Sized> Deadline for &D {
    #[inline]
    fn time_remaining(&self) -> Duration {
        (**self).time_remaining()
    }
}

/// A slice that never runs out. Ticks run until the render completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbounded;

impl Deadline for Unbounded {
    #[inline]
    fn time_remaining(&self) -> Duration {
        Duration::MAX
    }
}

/// A slice with no time left. Ticks perform no work.
#[derive(Clone, Copy, Debug, Default)]
pub struct Exhausted;

impl Deadline for Exhausted {
    #[inline]
    fn time_remaining(&self) -> Duration {
        Duration::ZERO
    }
}

/// A deterministic slice that loses a fixed cost on every query.
///
/// Each call to [`time_remaining`](Deadline::time_remaining) returns the
/// current budget and then subtracts `cost_per_query`, saturating at zero.
/// Since the work loop queries once per unit, the cost models the time each
/// unit takes.
#[derive(Clone, Debug)]
pub struct SimulatedDeadline {
    remaining: Cell<Duration>,
    cost_per_query: Duration,
}

impl SimulatedDeadline {
    /// Creates a slice with `budget` left, charging `cost_per_query` per query.
    #[must_use]
    pub const fn new(budget: Duration, cost_per_query: Duration) -> Self {
        Self {
            remaining: Cell::new(budget),
            cost_per_query,
        }
    }

    /// Returns the budget left without charging for the query.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining.get()
    }

    /// Starts a new slice with `budget` left.
    pub fn refill(&self, budget: Duration) {
        self.remaining.set(budget);
    }
}

impl Deadline for SimulatedDeadline {
    fn time_remaining(&self) -> Duration {
        let now = self.remaining.get();
        self.remaining.set(now.saturating_sub(self.cost_per_query));
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_and_exhausted() {
        assert_eq!(Unbounded.time_remaining(), Duration::MAX);
        assert_eq!(Exhausted.time_remaining(), Duration::ZERO);
    }

    #[test]
    fn simulated_charges_per_query() {
        let d = SimulatedDeadline::new(Duration::from_millis(2), Duration::from_micros(800));
        assert_eq!(d.time_remaining(), Duration(2000));
        assert_eq!(d.time_remaining(), Duration(1200));
        assert_eq!(d.time_remaining(), Duration(400));
        assert_eq!(d.time_remaining(), Duration::ZERO, "saturates");
        assert_eq!(d.remaining(), Duration::ZERO);
    }

    #[test]
    fn simulated_refill_starts_new_slice() {
        let d = SimulatedDeadline::new(Duration::ZERO, Duration::from_millis(1));
        assert_eq!(d.time_remaining(), Duration::ZERO);
        d.refill(Duration::from_millis(5));
        assert_eq!(d.remaining(), Duration::from_millis(5));
        assert_eq!(d.time_remaining(), Duration::from_millis(5));
        assert_eq!(d.remaining(), Duration::from_millis(4));
    }

    #[test]
    fn references_are_deadlines() {
        fn probe(d: impl Deadline) -> Duration {
            d.time_remaining()
        }
        let d = SimulatedDeadline::new(Duration(10), Duration(1));
        assert_eq!(probe(&d), Duration(10));
        assert_eq!(probe(&d), Duration(9));
        let dyn_d: &dyn Deadline = &Exhausted;
        assert_eq!(probe(dyn_d), Duration::ZERO);
    }
}
