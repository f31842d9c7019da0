//! Stored shapes for "which part of the image is visible".
//!
//! The crop box is canonical. Older documents carry a zoom-and-pan
//! `{scale, positionX, positionY}` instead, which only means something once
//! the viewport aspect ratio is known; [`ImageFraming::to_crop_rect`]
//! converts it.

use serde::{Deserialize, Serialize};

use crate::aspect::AspectRatio;
use crate::error::Result;
use crate::geometry::ImageGeometry;
use crate::rect::{CropRect, SizeBounds};

/// The four floats stored inside the invitation document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRecord {
    pub crop_x: f64,
    pub crop_y: f64,
    pub crop_width: f64,
    pub crop_height: f64,
}

impl From<CropRect> for CropRecord {
    fn from(rect: CropRect) -> Self {
        Self {
            crop_x: rect.x,
            crop_y: rect.y,
            crop_width: rect.width,
            crop_height: rect.height,
        }
    }
}

impl From<CropRecord> for CropRect {
    fn from(record: CropRecord) -> Self {
        CropRect::new(record.crop_x, record.crop_y, record.crop_width, record.crop_height)
    }
}

/// Legacy zoom-and-pan framing. `scale >= 1` zooms into the region that
/// covers the viewport; positions are percentages of the leftover slack,
/// like CSS `object-position`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalePosition {
    pub scale: f64,
    pub position_x: f64,
    pub position_y: f64,
}

impl ScalePosition {
    /// Best-effort inverse of [`ImageFraming::to_crop_rect`], for writing
    /// documents that older readers still understand.
    pub fn from_crop_rect(rect: &CropRect, geometry: ImageGeometry, viewport: AspectRatio) -> Self {
        let (cover_w, _) = cover_size(geometry, viewport);
        let scale = if rect.width > 0.0 { (cover_w / rect.width).max(1.0) } else { 1.0 };
        let percent = |pos: f64, size: f64| {
            let slack = 1.0 - size;
            if slack > f64::EPSILON { (pos / slack * 100.0).clamp(0.0, 100.0) } else { 50.0 }
        };
        Self {
            scale,
            position_x: percent(rect.x, rect.width),
            position_y: percent(rect.y, rect.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageFraming {
    CropBox(CropRecord),
    ScalePosition(ScalePosition),
}

impl ImageFraming {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Canonical crop box for this framing. Legacy framings are resolved
    /// against the viewport ratio and pulled inside `bounds`.
    pub fn to_crop_rect(&self, geometry: ImageGeometry, viewport: AspectRatio, bounds: &SizeBounds) -> Option<CropRect> {
        match self {
            ImageFraming::CropBox(record) => Some(CropRect::from(*record).sanitized(bounds)),
            ImageFraming::ScalePosition(legacy) => {
                if !geometry.is_known() {
                    return None;
                }
                let scale = if legacy.scale.is_finite() { legacy.scale.max(1.0) } else { 1.0 };
                let (cover_w, cover_h) = cover_size(geometry, viewport);
                let (mut w, mut h) = (cover_w / scale, cover_h / scale);

                let shrink = (bounds.max / w).min(bounds.max / h).min(1.0);
                w *= shrink;
                h *= shrink;

                let fraction = |p: f64| if p.is_finite() { p.clamp(0.0, 100.0) / 100.0 } else { 0.5 };
                let x = (1.0 - w) * fraction(legacy.position_x);
                let y = (1.0 - h) * fraction(legacy.position_y);
                Some(CropRect::new(x, y, w, h).sanitized(bounds))
            }
        }
    }
}

impl From<CropRect> for ImageFraming {
    fn from(rect: CropRect) -> Self {
        ImageFraming::CropBox(rect.into())
    }
}

/// Normalized size of the largest viewport-shaped region inside the image.
fn cover_size(geometry: ImageGeometry, viewport: AspectRatio) -> (f64, f64) {
    let norm = viewport.normalized_for(geometry.aspect());
    if norm <= 1.0 { (norm, 1.0) } else { (1.0, 1.0 / norm) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = CropRecord::from(CropRect::new(0.1, 0.2, 0.3, 0.4));
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cropX": 0.1, "cropY": 0.2, "cropWidth": 0.3, "cropHeight": 0.4 })
        );
    }

    #[test]
    fn framing_detects_both_shapes() {
        let crop = ImageFraming::from_json(
            r#"{ "cropX": 0.1, "cropY": 0.1, "cropWidth": 0.5, "cropHeight": 0.5, "caption": "x" }"#,
        )
        .unwrap();
        assert!(matches!(crop, ImageFraming::CropBox(_)));

        let legacy = ImageFraming::from_json(r#"{ "scale": 1.5, "positionX": 50, "positionY": 0 }"#).unwrap();
        assert_eq!(
            legacy,
            ImageFraming::ScalePosition(ScalePosition {
                scale: 1.5,
                position_x: 50.0,
                position_y: 0.0
            })
        );

        assert!(ImageFraming::from_json(r#"{ "cropX": 0.1 }"#).is_err());
    }

    #[test]
    fn crop_box_is_sanitized() {
        let framing = ImageFraming::CropBox(CropRecord {
            crop_x: 0.9,
            crop_y: 0.0,
            crop_width: 0.5,
            crop_height: 0.5,
        });
        let rect = framing
            .to_crop_rect(ImageGeometry::new(100, 100), AspectRatio::new(1.0).unwrap(), &SizeBounds::default())
            .unwrap();
        assert!(close(rect.x, 0.5));
    }

    #[test]
    fn legacy_scale_zooms_into_cover_region() {
        // 1600x1200 image in a square viewport covers 0.75 x 1.0.
        let legacy = ImageFraming::ScalePosition(ScalePosition {
            scale: 1.5,
            position_x: 50.0,
            position_y: 100.0,
        });
        let rect = legacy
            .to_crop_rect(ImageGeometry::new(1600, 1200), AspectRatio::new(1.0).unwrap(), &SizeBounds::default())
            .unwrap();
        assert!(close(rect.width, 0.5));
        assert!(close(rect.height, 2.0 / 3.0));
        assert!(close(rect.x, 0.25));
        assert!(close(rect.bottom(), 1.0));
    }

    #[test]
    fn legacy_unscaled_is_shrunk_into_bounds_keeping_aspect() {
        let legacy = ImageFraming::ScalePosition(ScalePosition {
            scale: 1.0,
            position_x: 0.0,
            position_y: 0.0,
        });
        let rect = legacy
            .to_crop_rect(ImageGeometry::new(1000, 1000), AspectRatio::new(1.0).unwrap(), &SizeBounds::default())
            .unwrap();
        assert!(close(rect.width, 0.98));
        assert!(close(rect.height, 0.98));
        assert_eq!((rect.x, rect.y), (0.0, 0.0));
    }

    #[test]
    fn legacy_needs_known_geometry() {
        let legacy = ImageFraming::ScalePosition(ScalePosition {
            scale: 2.0,
            position_x: 50.0,
            position_y: 50.0,
        });
        let rect = legacy.to_crop_rect(ImageGeometry::new(0, 0), AspectRatio::new(1.0).unwrap(), &SizeBounds::default());
        assert!(rect.is_none());
    }

    #[test]
    fn scale_position_from_crop_rect() {
        let geometry = ImageGeometry::new(1600, 1200);
        let viewport = AspectRatio::new(1.0).unwrap();
        let rect = CropRect::new(0.25, 1.0 / 3.0, 0.5, 2.0 / 3.0);
        let legacy = ScalePosition::from_crop_rect(&rect, geometry, viewport);
        assert!(close(legacy.scale, 1.5));
        assert!(close(legacy.position_x, 50.0));
        assert!(close(legacy.position_y, 100.0));
    }
}
