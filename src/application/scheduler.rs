//! Time source and the single in-flight operation slot.
//!
//! Simulated requests are modelled as a deadline: the operation is started,
//! and the event loop polls until the deadline passes. Tests substitute
//! [`ManualClock`] to step through the latency window without sleeping.

use crate::domain::Request;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ManualClock {
    pub fn new(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// The request currently waiting on its simulated latency.
#[derive(Debug, Clone)]
pub struct InFlight {
    pub request: Request,
    pub due: Instant,
}

impl InFlight {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

/// Holds at most one [`InFlight`] operation.
#[derive(Debug, Default)]
pub struct FlightSlot {
    current: Option<InFlight>,
}

impl FlightSlot {
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&InFlight> {
        self.current.as_ref()
    }

    /// Occupies the slot. Returns `false`, leaving the slot untouched, when
    /// it is already taken.
    pub fn start(&mut self, request: Request, now: Instant, latency: Duration) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(InFlight {
            request,
            due: now + latency,
        });
        true
    }

    /// Frees the slot if its operation is due and hands the operation back.
    pub fn take_due(&mut self, now: Instant) -> Option<InFlight> {
        if self.current.as_ref().is_some_and(|op| op.is_due(now)) {
            self.current.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserDraft;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let other = clock.clone();
        let start = clock.now();
        other.advance(Duration::from_millis(250));

        assert_eq!(clock.now(), start + Duration::from_millis(250));
    }

    #[test]
    fn test_slot_rejects_second_start() {
        let now = Instant::now();
        let mut slot = FlightSlot::default();

        assert!(slot.start(Request::Fetch, now, Duration::from_secs(1)));
        let create = Request::Create(UserDraft::new("Ann", "ann@x.com"));
        assert!(!slot.start(create, now, Duration::from_secs(1)));
        assert!(slot.is_busy());
        assert_eq!(slot.current().unwrap().request, Request::Fetch);
    }

    #[test]
    fn test_take_due_waits_for_deadline() {
        let now = Instant::now();
        let mut slot = FlightSlot::default();
        assert!(slot.start(Request::Fetch, now, Duration::from_secs(1)));

        assert!(slot.take_due(now + Duration::from_millis(999)).is_none());
        assert_eq!(
            slot.current().unwrap().remaining(now + Duration::from_millis(400)),
            Duration::from_millis(600)
        );

        let done = slot.take_due(now + Duration::from_secs(1)).unwrap();
        assert_eq!(done.request, Request::Fetch);
        assert!(!slot.is_busy());
    }

    #[test]
    fn test_slot_reusable_after_completion() {
        let now = Instant::now();
        let mut slot = FlightSlot::default();
        assert!(slot.start(Request::Fetch, now, Duration::ZERO));
        assert!(slot.take_due(now).is_some());

        assert!(slot.start(Request::Fetch, now, Duration::ZERO));
    }
}
