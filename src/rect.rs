//! The crop rectangle and its size bounds.
//!
//! All values are normalized to the image's natural pixel box:
//! `(0.0, 0.0)` is the top-left corner and `(1.0, 1.0)` the bottom-right.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

pub const MIN_SIZE: f64 = 0.2;
/// Leaves 2% of slack on every axis so a full-size rect can still be moved.
pub const MAX_SIZE: f64 = 0.98;

/// Allowed range for a rect's width and height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: MIN_SIZE,
            max: MAX_SIZE,
        }
    }
}

impl SizeBounds {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<()> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min < self.max
            && self.max <= 1.0;
        if ok {
            Ok(())
        } else {
            Err(CropError::InvalidBounds {
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Whether some rect of this normalized aspect has both sides in bounds.
    pub fn admits(&self, norm_aspect: f64) -> bool {
        self.min * norm_aspect <= self.max && self.min <= self.max * norm_aspect
    }

    /// Width range that keeps both dimensions in bounds for a normalized
    /// aspect `width / height`. When no width satisfies both, the range
    /// collapses onto its upper end so containment still wins.
    pub fn width_range(&self, norm_aspect: f64) -> (f64, f64) {
        let lo = self.min.max(self.min * norm_aspect);
        let hi = self.max.min(self.max * norm_aspect);
        (lo.min(hi), hi)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// `x >= 0, y >= 0, x + width <= 1, y + height <= 1` within `eps`.
    pub fn is_contained(&self, eps: f64) -> bool {
        self.x >= -eps && self.y >= -eps && self.right() <= 1.0 + eps && self.bottom() <= 1.0 + eps
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Keeps the size and pulls the position back inside the unit box.
    pub fn clamped_position(mut self) -> Self {
        self.x = self.x.clamp(0.0, (1.0 - self.width).max(0.0));
        self.y = self.y.clamp(0.0, (1.0 - self.height).max(0.0));
        self
    }

    /// Re-clamps a rect coming from storage. Stored records may be stale or
    /// corrupted, so nothing is trusted: non-finite values fall back to
    /// sensible defaults, sizes are bounded, then the position is clamped.
    pub fn sanitized(self, bounds: &SizeBounds) -> Self {
        let or = |v: f64, fallback: f64| if v.is_finite() { v } else { fallback };
        let width = or(self.width, bounds.max).clamp(bounds.min, bounds.max);
        let height = or(self.height, bounds.max).clamp(bounds.min, bounds.max);
        Self {
            x: or(self.x, 0.0),
            y: or(self.y, 0.0),
            width,
            height,
        }
        .clamped_position()
    }

    /// Integer pixel region `(x, y, width, height)` inside an image of the
    /// given natural size. Always at least 1x1 and never past the edges.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let w = image_width as f64;
        let h = image_height as f64;

        let x = ((self.x * w).max(0.0) as u32).min(image_width.saturating_sub(1));
        let y = ((self.y * h).max(0.0) as u32).min(image_height.saturating_sub(1));
        let width = ((self.width * w).round().max(1.0) as u32).min(image_width - x);
        let height = ((self.height * h).round().max(1.0) as u32).min(image_height - y);
        (x, y, width, height)
    }
}
