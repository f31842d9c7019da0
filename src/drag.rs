//! Per-gesture state machine: `Idle` or `Dragging(handle)`.

use crate::geometry::{Point, Size, to_normalized_delta};
use crate::rect::CropRect;
use crate::solver::{ConstraintSolver, ResizeHandle};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub handle: ResizeHandle,
    pub start_pointer: Point,
    /// Snapshot every candidate is derived from.
    pub start_rect: CropRect,
    /// Last candidate; `None` until the pointer has moved.
    pub candidate: Option<CropRect>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn active_handle(&self) -> Option<ResizeHandle> {
        match &self.state {
            DragState::Dragging(session) => Some(session.handle),
            DragState::Idle => None,
        }
    }

    /// Starts a session. Returns `false` (and changes nothing) if one is
    /// already running.
    pub fn begin(&mut self, handle: ResizeHandle, pointer: Point, current: CropRect) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging(DragSession {
            handle,
            start_pointer: pointer,
            start_rect: current,
            candidate: None,
        });
        true
    }

    /// Recomputes the candidate from the session start and the cumulative
    /// pointer delta. `None` when idle or when the container is unmeasured.
    pub fn update(&mut self, pointer: Point, container: Size, solver: &ConstraintSolver) -> Option<CropRect> {
        let DragState::Dragging(session) = &mut self.state else {
            return None;
        };
        let delta = to_normalized_delta(pointer - session.start_pointer, container).ok()?;
        let candidate = solver.solve(session.handle, &session.start_rect, delta);
        session.candidate = Some(candidate);
        Some(candidate)
    }

    /// Ends the session and hands back the candidate to commit, if the
    /// pointer moved at all.
    pub fn finish(&mut self) -> Option<CropRect> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => session.candidate,
            DragState::Idle => None,
        }
    }

    /// Ends the session discarding its candidate. Returns whether a session
    /// was active.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectRatio;
    use crate::geometry::ImageGeometry;
    use crate::rect::SizeBounds;
    use crate::solver::ResizeRule;

    fn solver() -> ConstraintSolver {
        ConstraintSolver::new(
            AspectRatio::new(1.0).unwrap(),
            ImageGeometry::new(800, 800),
            SizeBounds::default(),
            ResizeRule::Diagonal,
        )
    }

    const CONTAINER: Size = Size::new(400.0, 400.0);
    const START: CropRect = CropRect::new(0.25, 0.25, 0.5, 0.5);

    #[test]
    fn idle_ignores_moves() {
        let mut drag = DragController::default();
        assert!(drag.update(Point::new(10.0, 10.0), CONTAINER, &solver()).is_none());
        assert!(drag.finish().is_none());
    }

    #[test]
    fn second_pointer_down_is_ignored() {
        let mut drag = DragController::default();
        assert!(drag.begin(ResizeHandle::Center, Point::new(0.0, 0.0), START));
        assert!(!drag.begin(ResizeHandle::TopLeft, Point::new(5.0, 5.0), START));
        assert_eq!(drag.active_handle(), Some(ResizeHandle::Center));
    }

    #[test]
    fn candidates_use_cumulative_delta() {
        let mut drag = DragController::default();
        drag.begin(ResizeHandle::Center, Point::new(100.0, 100.0), START);
        drag.update(Point::new(140.0, 100.0), CONTAINER, &solver());
        let rect = drag.update(Point::new(120.0, 100.0), CONTAINER, &solver()).unwrap();
        // 20px of 400 from the start, not 40 - 20 accumulated.
        assert!((rect.x - 0.3).abs() < 1e-12);
        assert_eq!(drag.finish(), Some(rect));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_without_move_commits_nothing() {
        let mut drag = DragController::default();
        drag.begin(ResizeHandle::BottomRight, Point::new(0.0, 0.0), START);
        assert!(drag.finish().is_none());
    }

    #[test]
    fn unmeasured_container_suppresses_updates() {
        let mut drag = DragController::default();
        drag.begin(ResizeHandle::Center, Point::new(0.0, 0.0), START);
        assert!(drag.update(Point::new(50.0, 0.0), Size::default(), &solver()).is_none());
        assert!(drag.finish().is_none());
    }

    #[test]
    fn cancel_drops_candidate() {
        let mut drag = DragController::default();
        drag.begin(ResizeHandle::Center, Point::new(0.0, 0.0), START);
        drag.update(Point::new(50.0, 0.0), CONTAINER, &solver());
        assert!(drag.cancel());
        assert!(!drag.cancel());
        assert!(drag.finish().is_none());
    }
}
