use crate::aspect::AspectRatio;
use crate::geometry::ImageGeometry;
use crate::rect::CropRect;

/// Largest centered rect of the target aspect ratio, each side capped at
/// `max_init_size`. Returns `None` while the image size is unknown.
pub fn initial_rect(geometry: ImageGeometry, ratio: AspectRatio, max_init_size: f64) -> Option<CropRect> {
    if !geometry.is_known() {
        return None;
    }
    let natural_w = geometry.natural_width as f64;
    let natural_h = geometry.natural_height as f64;
    let ratio = ratio.get();

    let (width, height) = if geometry.aspect() > ratio {
        (max_init_size.min(ratio * natural_h / natural_w), max_init_size)
    } else {
        (max_init_size, max_init_size.min(natural_w / (ratio * natural_h)))
    };

    Some(CropRect::new((1.0 - width) / 2.0, (1.0 - height) / 2.0, width, height))
}
