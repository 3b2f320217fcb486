//! Delayed-callback contract consumed by the engine, plus [`TimerQueue`], a
//! virtual-clock implementation the host advances (frame loop or tests).

/// Opaque handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Payload delivered back to the engine when a timer fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Timer {
    /// Light one square.
    Flash(u8),
    /// Playback is over; the player reproduces the sequence next.
    OpenInput,
    /// Pause after a completed round is over; add a step.
    AdvanceRound,
}

/// Single-threaded delayed-callback facility.
pub trait Scheduler {
    /// Deliver `timer` once, at least `delay_ms` from now.
    fn after(&mut self, delay_ms: u32, timer: Timer) -> TimerId;
    /// Suppress a timer that has not fired yet. Unknown ids are ignored.
    fn cancel(&mut self, id: TimerId);
}

#[derive(Debug)]
struct Pending {
    id: TimerId,
    deadline_ms: f64,
    timer: Timer,
}

/// Timers ordered by deadline (insertion order breaks ties) over a clock
/// that only moves forward.
#[derive(Debug)]
pub struct TimerQueue {
    now_ms: f64,
    next_id: u64,
    // kept in insertion order; queues stay short (one playback at a time)
    pending: Vec<Pending>,
}

impl TimerQueue {
    pub fn new(start_ms: f64) -> Self {
        Self { now_ms: start_ms, next_id: 0, pending: Vec::new() }
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward to `now_ms`; earlier values are ignored.
    pub fn set_now(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Remove and return the earliest timer due at or before `until_ms`.
    /// The clock moves to that timer's deadline so work scheduled while
    /// handling it is measured from the moment it was due.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerId, Timer)> {
        let mut best: Option<usize> = None;
        for (idx, p) in self.pending.iter().enumerate() {
            if p.deadline_ms > until_ms {
                continue;
            }
            match best {
                // earlier entry wins ties
                Some(b) if self.pending[b].deadline_ms <= p.deadline_ms => {}
                _ => best = Some(idx),
            }
        }
        let entry = self.pending.remove(best?);
        self.set_now(entry.deadline_ms);
        Some((entry.id, entry.timer))
    }
}

impl Scheduler for TimerQueue {
    fn after(&mut self, delay_ms: u32, timer: Timer) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, deadline_ms: self.now_ms + delay_ms as f64, timer });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|p| p.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new(0.0);
        q.after(300, Timer::Flash(2));
        q.after(100, Timer::Flash(0));
        q.after(200, Timer::Flash(1));
        assert_eq!(q.pop_due(1_000.0).map(|(_, t)| t), Some(Timer::Flash(0)));
        assert_eq!(q.now(), 100.0);
        assert_eq!(q.pop_due(1_000.0).map(|(_, t)| t), Some(Timer::Flash(1)));
        assert_eq!(q.pop_due(1_000.0).map(|(_, t)| t), Some(Timer::Flash(2)));
        assert!(q.pop_due(1_000.0).is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn equal_deadlines_fire_in_insertion_order() {
        let mut q = TimerQueue::new(0.0);
        q.after(50, Timer::AdvanceRound);
        q.after(50, Timer::Flash(3));
        q.after(50, Timer::OpenInput);
        let order: Vec<Timer> = std::iter::from_fn(|| q.pop_due(50.0).map(|(_, t)| t)).collect();
        assert_eq!(
            order,
            vec![Timer::AdvanceRound, Timer::Flash(3), Timer::OpenInput]
        );
    }

    #[test]
    fn timers_not_yet_due_stay_queued() {
        let mut q = TimerQueue::new(1_000.0);
        q.after(500, Timer::Flash(1));
        assert!(q.pop_due(1_499.0).is_none());
        assert_eq!(q.len(), 1);
        assert!(q.pop_due(1_500.0).is_some());
    }

    #[test]
    fn cancel_removes_only_that_timer() {
        let mut q = TimerQueue::new(0.0);
        let a = q.after(10, Timer::Flash(0));
        let b = q.after(20, Timer::Flash(1));
        q.cancel(a);
        q.cancel(a); // second cancel is a no-op
        let (id, timer) = q.pop_due(100.0).unwrap();
        assert_eq!(id, b);
        assert_eq!(timer, Timer::Flash(1));
    }

    #[test]
    fn clock_never_moves_backwards() {
        let mut q = TimerQueue::new(500.0);
        q.set_now(100.0);
        assert_eq!(q.now(), 500.0);
        q.set_now(750.0);
        let id = q.after(0, Timer::AdvanceRound);
        assert_eq!(q.pop_due(750.0), Some((id, Timer::AdvanceRound)));
    }
}
