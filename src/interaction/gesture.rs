//! Tap-to-place / hold-to-remove gesture recognition.
//!
//! The controller is a per-pointer state machine fed with already-picked
//! candidates and explicit timestamps. It knows nothing about the windowing
//! system, the picker, or wall-clock time, so any event source can drive it.

use std::time::{Duration, Instant};

use crate::voxel::coords::Cell;
use super::picker::PickResult;

/// Identifier of a pointer (mouse, touch point, pen)
pub type PointerId = u64;

/// Pointer event in normalized device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down { id: PointerId, position: glam::Vec2 },
    Move { id: PointerId, position: glam::Vec2 },
    Up { id: PointerId, position: glam::Vec2 },
    /// Capture lost or the platform cancelled the gesture
    Cancel { id: PointerId },
    /// Pointer left the canvas
    Leave { id: PointerId },
}

impl PointerEvent {
    pub fn id(&self) -> PointerId {
        match *self {
            PointerEvent::Down { id, .. }
            | PointerEvent::Move { id, .. }
            | PointerEvent::Up { id, .. }
            | PointerEvent::Cancel { id }
            | PointerEvent::Leave { id } => id,
        }
    }

    /// Screen position, for events that carry one
    pub fn position(&self) -> Option<glam::Vec2> {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => Some(position),
            PointerEvent::Cancel { .. } | PointerEvent::Leave { .. } => None,
        }
    }
}

/// Edit requested by a completed (or long-pressed) gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureCommit {
    Place(Cell),
    Remove(Cell),
}

/// Pointer currently being tracked
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tracking {
    pub pointer: PointerId,
    pub place: Option<Cell>,
    pub remove: Option<Cell>,
    /// When the long-press fires; None once disarmed or fired
    pub deadline: Option<Instant>,
    pub long_press_fired: bool,
}

/// Gesture state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GestureState {
    #[default]
    Idle,
    Tracking(Tracking),
}

/// Distinguishes tap (place) from press-and-hold (remove)
#[derive(Clone, Debug)]
pub struct GestureController {
    state: GestureState,
    long_press: Duration,
}

impl GestureController {
    pub fn new(long_press: Duration) -> Self {
        Self {
            state: GestureState::Idle,
            long_press,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, GestureState::Tracking(_))
    }

    /// Pointer tracked by the current gesture
    pub fn tracked_pointer(&self) -> Option<PointerId> {
        match &self.state {
            GestureState::Tracking(t) => Some(t.pointer),
            GestureState::Idle => None,
        }
    }

    /// Start tracking if idle and something editable is under the pointer.
    pub fn pointer_down(&mut self, id: PointerId, candidates: &PickResult, now: Instant) {
        if self.is_tracking() || !candidates.has_candidate() {
            return;
        }
        self.state = GestureState::Tracking(Tracking {
            pointer: id,
            place: candidates.place,
            remove: candidates.remove,
            deadline: candidates.remove.map(|_| now + self.long_press),
            long_press_fired: false,
        });
    }

    /// Refresh candidates; moving off a removable block cancels the long-press.
    pub fn pointer_move(&mut self, id: PointerId, candidates: &PickResult) {
        let GestureState::Tracking(t) = &mut self.state else {
            return;
        };
        if t.pointer != id {
            return;
        }
        t.place = candidates.place;
        t.remove = candidates.remove;
        if t.remove.is_none() {
            t.deadline = None;
        }
    }

    /// Fire the long-press if its deadline has passed.
    pub fn tick(&mut self, now: Instant) -> Option<GestureCommit> {
        let GestureState::Tracking(t) = &mut self.state else {
            return None;
        };
        let deadline = t.deadline?;
        if now < deadline || t.long_press_fired {
            return None;
        }
        t.deadline = None;
        let cell = t.remove?;
        t.long_press_fired = true;
        Some(GestureCommit::Remove(cell))
    }

    /// Finish the gesture. A tap places; a fired long-press places nothing.
    pub fn pointer_up(&mut self, id: PointerId) -> Option<GestureCommit> {
        let GestureState::Tracking(t) = self.state else {
            return None;
        };
        if t.pointer != id {
            return None;
        }
        self.state = GestureState::Idle;
        if t.long_press_fired {
            return None;
        }
        t.place.map(GestureCommit::Place)
    }

    /// Abort the gesture without committing anything.
    pub fn pointer_cancel(&mut self, id: PointerId) {
        if self.tracked_pointer() == Some(id) {
            self.state = GestureState::Idle;
        }
    }

    /// Drop any gesture in progress (focus loss, teardown)
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOLD: Duration = Duration::from_millis(450);

    fn both() -> PickResult {
        PickResult {
            place: Some(Cell::new(8, 1, 8)),
            remove: Some(Cell::new(8, 0, 8)),
            hit: None,
        }
    }

    fn place_only() -> PickResult {
        PickResult {
            place: Some(Cell::new(2, 0, 2)),
            remove: None,
            hit: None,
        }
    }

    #[test]
    fn test_tap_places() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);
        assert!(g.tick(t0 + Duration::from_millis(100)).is_none());
        assert_eq!(g.pointer_up(1), Some(GestureCommit::Place(Cell::new(8, 1, 8))));
        assert!(!g.is_tracking());
    }

    #[test]
    fn test_hold_removes_then_release_does_nothing() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);

        assert_eq!(g.tick(t0 + HOLD), Some(GestureCommit::Remove(Cell::new(8, 0, 8))));
        // Fires once
        assert!(g.tick(t0 + HOLD * 2).is_none());
        assert!(g.is_tracking());

        assert_eq!(g.pointer_up(1), None);
        assert!(!g.is_tracking());
    }

    #[test]
    fn test_no_timer_without_removal_candidate() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &place_only(), t0);
        assert!(g.tick(t0 + HOLD * 4).is_none());
        assert_eq!(g.pointer_up(1), Some(GestureCommit::Place(Cell::new(2, 0, 2))));
    }

    #[test]
    fn test_moving_off_block_disarms() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);
        g.pointer_move(1, &place_only());
        assert!(g.tick(t0 + HOLD * 2).is_none());
        assert_eq!(g.pointer_up(1), Some(GestureCommit::Place(Cell::new(2, 0, 2))));
    }

    #[test]
    fn test_move_refreshes_removal_target() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);
        let other = PickResult {
            place: None,
            remove: Some(Cell::new(3, 0, 3)),
            hit: None,
        };
        g.pointer_move(1, &other);
        assert_eq!(g.tick(t0 + HOLD), Some(GestureCommit::Remove(Cell::new(3, 0, 3))));
    }

    #[test]
    fn test_down_without_candidate_stays_idle() {
        let mut g = GestureController::new(HOLD);
        g.pointer_down(1, &PickResult::NONE, Instant::now());
        assert!(!g.is_tracking());
        assert_eq!(g.pointer_up(1), None);
    }

    #[test]
    fn test_second_pointer_ignored() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);
        g.pointer_down(2, &place_only(), t0);
        g.pointer_move(2, &PickResult::NONE);
        assert_eq!(g.pointer_up(2), None);
        assert_eq!(g.tracked_pointer(), Some(1));
        assert_eq!(g.pointer_up(1), Some(GestureCommit::Place(Cell::new(8, 1, 8))));
    }

    #[test]
    fn test_cancel_and_leave_commit_nothing() {
        let mut g = GestureController::new(HOLD);
        let t0 = Instant::now();
        g.pointer_down(1, &both(), t0);
        g.pointer_cancel(1);
        assert!(!g.is_tracking());
        assert!(g.tick(t0 + HOLD).is_none());
        assert_eq!(g.pointer_up(1), None);

        // A new gesture can start afterwards
        g.pointer_down(3, &both(), t0);
        assert_eq!(g.tracked_pointer(), Some(3));
        g.reset();
        assert!(!g.is_tracking());
    }

    #[test]
    fn test_event_accessors() {
        let e = PointerEvent::Move { id: 4, position: glam::Vec2::new(0.5, -0.5) };
        assert_eq!(e.id(), 4);
        assert_eq!(e.position(), Some(glam::Vec2::new(0.5, -0.5)));
        assert_eq!(PointerEvent::Leave { id: 9 }.position(), None);
    }
}
