//! Debounced sampling of raw digital input lines.
//!
//! Mechanical switches and long wires bounce: a single press shows up as a
//! burst of electrical transitions. [`DebouncedLine`] is a two-state machine
//! (stable-low, stable-high) with a refractory guard: a differing raw
//! reading is accepted as a real edge only once the line has been quiet for
//! longer than [`DEBOUNCE_WINDOW_MS`](crate::consts::DEBOUNCE_WINDOW_MS).
//! Transitions observed inside the window are dropped, not deferred —
//! bounces are lost by design.
//!
//! The sampler takes caller-supplied monotonic millisecond timestamps and
//! performs no I/O itself; the composition layer reads the pins (pull-up
//! convention, electrical LOW = pressed) and feeds the logical level in.
//! Each line is sampled independently; simultaneous active readings on both
//! lines are a legitimate condition handled by the speed model.

use crate::consts::DEBOUNCE_WINDOW_MS;

/// Identifies which logical input line an edge was observed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Line {
    /// The forward/up input line.
    Forward,
    /// The backward/down input line.
    Backward,
}

/// A debounced, accepted level transition on one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct EdgeEvent {
    /// The line the transition was observed on.
    pub line: Line,
    /// The new stable level (`true` = active/pressed).
    pub level: bool,
}

/// Debounce state for a single input line.
///
/// Holds the last accepted stable level and the timestamp of the last
/// accepted change. Mutated only by [`poll`](DebouncedLine::poll) from the
/// main loop; created at startup and never destroyed.
#[derive(Debug, Clone, Copy)]
pub struct DebouncedLine {
    line: Line,
    last_stable: bool,
    last_change_ms: u32,
}

impl DebouncedLine {
    /// Creates the sampler for one line, initialized to its physical
    /// resting level.
    ///
    /// The change timestamp is biased backwards past the debounce window so
    /// the first real transition is always eligible — there is no
    /// artificial first-poll suppression.
    pub fn new(line: Line, resting_level: bool) -> Self {
        Self {
            line,
            last_stable: resting_level,
            last_change_ms: 0u32.wrapping_sub(DEBOUNCE_WINDOW_MS + 1),
        }
    }

    /// Samples the line once.
    ///
    /// Accepts the transition iff `raw_level` differs from the last stable
    /// level **and** more than the debounce window has elapsed since the
    /// last accepted change. On accept, the stable level and timestamp are
    /// updated and the edge is emitted; otherwise nothing changes.
    ///
    /// Timestamp arithmetic is wrapping, so a `u32` millisecond rollover
    /// (about 49.7 days) does not wedge the sampler.
    pub fn poll(&mut self, raw_level: bool, now_ms: u32) -> Option<EdgeEvent> {
        if raw_level != self.last_stable
            && now_ms.wrapping_sub(self.last_change_ms) > DEBOUNCE_WINDOW_MS
        {
            self.last_stable = raw_level;
            self.last_change_ms = now_ms;
            return Some(EdgeEvent {
                line: self.line,
                level: raw_level,
            });
        }
        None
    }

    /// The last accepted stable level of this line.
    pub fn stable_level(&self) -> bool {
        self.last_stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_transition_is_always_eligible() {
        let mut line = DebouncedLine::new(Line::Forward, false);
        let edge = line.poll(true, 0).expect("startup edge suppressed");
        assert_eq!(
            edge,
            EdgeEvent {
                line: Line::Forward,
                level: true
            }
        );
    }

    #[test]
    fn bounce_burst_emits_at_most_one_edge() {
        let mut line = DebouncedLine::new(Line::Backward, false);
        // First press accepted, then a bounce burst every 5 ms.
        assert!(line.poll(true, 100).is_some());
        let mut events = 0;
        for (i, raw) in [false, true, false, true, false, true].iter().enumerate() {
            if line.poll(*raw, 105 + 5 * i as u32).is_some() {
                events += 1;
            }
        }
        assert_eq!(events, 0);
        assert!(line.stable_level());
    }

    #[test]
    fn sustained_release_past_window_is_accepted() {
        let mut line = DebouncedLine::new(Line::Forward, false);
        assert!(line.poll(true, 100).is_some());
        assert!(line.poll(false, 120).is_none());
        let edge = line.poll(false, 151).expect("release past window dropped");
        assert!(!edge.level);
    }

    #[test]
    fn short_glitches_after_an_edge_never_surface() {
        // Stable-high with an accepted change just before: a drop inside
        // the window, a return, and a drop past the window emit exactly one
        // edge, at the last drop.
        let mut line = DebouncedLine::new(Line::Forward, false);
        assert!(line.poll(true, 990).is_some()); // now stable-high, t=990
        assert!(line.poll(false, 1000).is_none()); // 10 ms after change
        assert!(line.poll(true, 1010).is_none()); // matches stable level
        let edge = line.poll(false, 1060).expect("edge past window dropped");
        assert!(!edge.level);
        assert_eq!(edge.line, Line::Forward);
    }

    #[test]
    fn wrapping_timestamps_do_not_wedge_the_sampler() {
        let mut line = DebouncedLine::new(Line::Forward, false);
        assert!(line.poll(true, 100).is_some());
        assert!(line.poll(false, u32::MAX - 10).is_some());
        // 60 ms later, past the wrap point.
        assert!(line.poll(true, 49).is_some());
    }
}
