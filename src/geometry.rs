//! Conversions between pointer pixels and the normalized unit square.

use crate::error::{CropError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True once both sides are positive and finite.
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Pointer movement expressed as a fraction of the displayed image box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizedDelta {
    pub dx: f64,
    pub dy: f64,
}

/// `pointer_delta / container_size` per axis. Fails while the container
/// has not been measured so callers can drop the event.
pub fn to_normalized_delta(pointer_delta: Point, container: Size) -> Result<NormalizedDelta> {
    if !container.is_measured() {
        return Err(CropError::UnmeasuredContainer {
            width: container.width,
            height: container.height,
        });
    }
    Ok(NormalizedDelta {
        dx: pointer_delta.x / container.width,
        dy: pointer_delta.y / container.height,
    })
}

/// Natural pixel size of the loaded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageGeometry {
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageGeometry {
    pub fn new(natural_width: u32, natural_height: u32) -> Self {
        Self {
            natural_width,
            natural_height,
        }
    }

    /// Zero-sized images have not finished loading; the editor stays inert.
    pub fn is_known(&self) -> bool {
        self.natural_width > 0 && self.natural_height > 0
    }

    pub fn aspect(&self) -> f64 {
        self.natural_width as f64 / self.natural_height as f64
    }

    /// Size to fit within `available` while keeping the image's aspect ratio.
    /// The usable width is capped at `max_aspect * height`.
    pub fn display_size(&self, available: Size, max_aspect: f64) -> Size {
        if !self.is_known() || !available.is_measured() {
            return Size::default();
        }
        let max_w = available.width.min(available.height * max_aspect);
        let image_w = self.natural_width as f64;
        let image_h = self.natural_height as f64;

        let scale = (max_w / image_w).min(available.height / image_h);
        Size::new(image_w * scale, image_h * scale)
    }
}

/// The on-screen box the image is drawn into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayBox {
    pub origin: Point,
    pub size: Size,
}

impl DisplayBox {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn to_screen(&self, normalized: Point) -> Point {
        Point::new(
            self.origin.x + normalized.x * self.size.width,
            self.origin.y + normalized.y * self.size.height,
        )
    }

    pub fn to_normalized(&self, screen: Point) -> Result<Point> {
        let d = to_normalized_delta(screen - self.origin, self.size)?;
        Ok(Point::new(d.dx, d.dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_divides_by_container() {
        let d = to_normalized_delta(Point::new(50.0, -20.0), Size::new(200.0, 400.0)).unwrap();
        assert_eq!(d, NormalizedDelta { dx: 0.25, dy: -0.05 });
    }

    #[test]
    fn unmeasured_container_is_an_error() {
        let err = to_normalized_delta(Point::new(1.0, 1.0), Size::new(0.0, 300.0));
        assert!(matches!(err, Err(CropError::UnmeasuredContainer { .. })));
        assert!(to_normalized_delta(Point::new(1.0, 1.0), Size::new(f64::NAN, 1.0)).is_err());
    }

    #[test]
    fn display_size_fits_and_keeps_aspect() {
        let geometry = ImageGeometry::new(1600, 1200);
        let size = geometry.display_size(Size::new(800.0, 800.0), 1.5);
        assert_eq!(size, Size::new(800.0, 600.0));
    }

    #[test]
    fn display_size_caps_container_width() {
        let geometry = ImageGeometry::new(3000, 1000);
        // 1000 wide available, but only 1.5 * 400 = 600 usable.
        let size = geometry.display_size(Size::new(1000.0, 400.0), 1.5);
        assert!((size.width - 600.0).abs() < 1e-9);
        assert!((size.height - 200.0).abs() < 1e-9);
    }

    #[test]
    fn display_size_is_zero_for_unknown_image() {
        let geometry = ImageGeometry::new(0, 0);
        assert!(!geometry.is_known());
        assert_eq!(geometry.display_size(Size::new(100.0, 100.0), 1.5), Size::default());
    }

    #[test]
    fn display_box_round_trips_points() {
        let b = DisplayBox::new(Point::new(20.0, 10.0), Size::new(400.0, 300.0));
        let screen = b.to_screen(Point::new(0.5, 0.5));
        assert_eq!(screen, Point::new(220.0, 160.0));
        assert_eq!(b.to_normalized(screen).unwrap(), Point::new(0.5, 0.5));
    }
}
