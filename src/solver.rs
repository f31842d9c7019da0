//! Candidate rects for a drag gesture.
//!
//! Every candidate is derived from the rect captured when the gesture
//! started plus the cumulative pointer delta, never from the previous
//! frame, so replaying a pointer-move gives the same answer.

use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::geometry::{ImageGeometry, NormalizedDelta};
use crate::rect::{CropRect, SizeBounds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// The rect body; dragging it moves the rect without resizing.
    Center,
}

impl ResizeHandle {
    pub const CORNERS: [ResizeHandle; 4] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::TopLeft => "nw",
            ResizeHandle::TopRight => "ne",
            ResizeHandle::BottomLeft => "sw",
            ResizeHandle::BottomRight => "se",
            ResizeHandle::Center => "move",
        }
    }

    /// Direction in which dragging the handle grows the rect, per axis.
    fn growth(&self) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (-1.0, -1.0),
            ResizeHandle::TopRight => (1.0, -1.0),
            ResizeHandle::BottomLeft => (-1.0, 1.0),
            ResizeHandle::BottomRight => (1.0, 1.0),
            ResizeHandle::Center => (0.0, 0.0),
        }
    }

    /// The corner diagonally opposite the handle. It stays fixed while the
    /// handle is dragged.
    pub fn anchor(&self, rect: &CropRect) -> (f64, f64) {
        match self {
            ResizeHandle::TopLeft => (rect.right(), rect.bottom()),
            ResizeHandle::TopRight => (rect.x, rect.bottom()),
            ResizeHandle::BottomLeft => (rect.right(), rect.y),
            ResizeHandle::BottomRight => (rect.x, rect.y),
            ResizeHandle::Center => rect.center(),
        }
    }
}

/// How a two-axis pointer delta becomes a single size change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeRule {
    /// Average of the two axis deltas, signed by the handle's direction.
    #[default]
    Diagonal,
    /// Projects the dragged corner onto the aspect-locked line through the
    /// anchor, measured in image pixels.
    Projected,
}

/// Keeps candidates contained, size bounded and locked to the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintSolver {
    ratio: f64,
    /// `width / height` in normalized units.
    norm_aspect: f64,
    bounds: SizeBounds,
    rule: ResizeRule,
}

impl ConstraintSolver {
    /// `geometry` must be known; the editor never builds a solver before that.
    pub fn new(ratio: AspectRatio, geometry: ImageGeometry, bounds: SizeBounds, rule: ResizeRule) -> Self {
        Self {
            ratio: ratio.get(),
            norm_aspect: ratio.normalized_for(geometry.aspect()),
            bounds,
            rule,
        }
    }

    pub fn norm_aspect(&self) -> f64 {
        self.norm_aspect
    }

    pub fn solve(&self, handle: ResizeHandle, start: &CropRect, delta: NormalizedDelta) -> CropRect {
        match handle {
            ResizeHandle::Center => translate(start, delta),
            corner => self.resize_corner(corner, start, delta),
        }
    }

    /// Reshapes `rect` to the current aspect ratio around its center,
    /// keeping its major dimension where the bounds allow.
    pub fn refit(&self, rect: &CropRect) -> CropRect {
        let (cx, cy) = rect.center();
        let major = rect.width.max(rect.height);
        let proposed = if self.norm_aspect >= 1.0 {
            major
        } else {
            major * self.norm_aspect
        };
        let (width, height) = self.fit(proposed, 1.0, 1.0);
        CropRect::new(cx - width / 2.0, cy - height / 2.0, width, height).clamped_position()
    }

    fn resize_corner(&self, handle: ResizeHandle, start: &CropRect, delta: NormalizedDelta) -> CropRect {
        let (gx, gy) = handle.growth();
        let (ax, ay) = handle.anchor(start);

        let proposed = match self.rule {
            ResizeRule::Diagonal => start.width + (gx * delta.dx + gy * delta.dy) / 2.0,
            ResizeRule::Projected => self.projected_width(start, gx * delta.dx, gy * delta.dy),
        };

        let room_x = if gx > 0.0 { 1.0 - ax } else { ax };
        let room_y = if gy > 0.0 { 1.0 - ay } else { ay };
        let (width, height) = self.fit(proposed, room_x, room_y);

        let x = if gx > 0.0 { ax } else { ax - width };
        let y = if gy > 0.0 { ay } else { ay - height };
        CropRect::new(x, y, width, height).clamped_position()
    }

    /// Whether `rect` already has the locked aspect within `1e-6`.
    pub fn is_locked(&self, rect: &CropRect) -> bool {
        (rect.width / rect.height - self.norm_aspect).abs() <= 1e-6
    }

    /// Width whose aspect-locked size is closest to the raw dragged size.
    /// Heights are in image-height units and widths are scaled by the image
    /// aspect so both axes are in the same pixel-proportional space.
    fn projected_width(&self, start: &CropRect, grow_x: f64, grow_y: f64) -> f64 {
        let image_aspect = self.ratio / self.norm_aspect;
        let raw_w = (start.width + grow_x) * image_aspect;
        let raw_h = start.height + grow_y;

        let lambda = (raw_w * self.ratio + raw_h) / (self.ratio * self.ratio + 1.0);
        lambda * self.norm_aspect
    }

    /// Clamps in a fixed order: size bounds, then the room left between the
    /// anchor and the image edges. The dependent side is rederived after
    /// each clamp. If the anchor leaves too little room for any in-bounds
    /// rect, the bounds are kept and the caller shifts the rect inside.
    fn fit(&self, proposed: f64, room_x: f64, room_y: f64) -> (f64, f64) {
        let (lo, hi) = self.bounds.width_range(self.norm_aspect);

        let mut width = proposed.max(lo).min(hi);
        if width > room_x {
            width = room_x;
        }
        let mut height = width / self.norm_aspect;
        if height > room_y {
            height = room_y.min(self.bounds.max);
            width = height * self.norm_aspect;
        }
        if width < lo && self.bounds.admits(self.norm_aspect) {
            width = lo;
            height = lo / self.norm_aspect;
        }
        (width, height)
    }
}

fn translate(start: &CropRect, delta: NormalizedDelta) -> CropRect {
    let max_x = (1.0 - start.width).max(0.0);
    let max_y = (1.0 - start.height).max(0.0);
    CropRect {
        x: (start.x + delta.dx).max(0.0).min(max_x),
        y: (start.y + delta.dy).max(0.0).min(max_y),
        ..*start
    }
}
