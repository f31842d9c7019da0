use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

/// Target `width / height` of the cropped region, in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct AspectRatio(f64);

impl AspectRatio {
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(CropError::InvalidAspectRatio(ratio))
        }
    }

    pub fn from_sides(width: u32, height: u32) -> Result<Self> {
        Self::new(width as f64 / height as f64)
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// The ratio in normalized units for an image of the given aspect:
    /// a rect of this `width / height` in the unit square maps to `self`
    /// in image pixels.
    pub fn normalized_for(self, image_aspect: f64) -> f64 {
        self.0 / image_aspect
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AspectPreset {
    Original,
    #[default]
    Square,
    // Landscape
    R3_2,
    R4_3,
    R16_9,
    R16_10,
    // Portrait
    R2_3,
    R3_4,
    R9_16,
    R10_16,
    Custom(u32, u32),
}

impl AspectPreset {
    pub const LANDSCAPE: [AspectPreset; 4] = [
        AspectPreset::R3_2,
        AspectPreset::R4_3,
        AspectPreset::R16_9,
        AspectPreset::R16_10,
    ];

    pub const PORTRAIT: [AspectPreset; 4] = [
        AspectPreset::R2_3,
        AspectPreset::R3_4,
        AspectPreset::R9_16,
        AspectPreset::R10_16,
    ];

    /// Same preset with the other orientation.
    pub fn counterpart(&self) -> Self {
        match *self {
            AspectPreset::R3_2 => AspectPreset::R2_3,
            AspectPreset::R4_3 => AspectPreset::R3_4,
            AspectPreset::R16_9 => AspectPreset::R9_16,
            AspectPreset::R16_10 => AspectPreset::R10_16,
            AspectPreset::R2_3 => AspectPreset::R3_2,
            AspectPreset::R3_4 => AspectPreset::R4_3,
            AspectPreset::R9_16 => AspectPreset::R16_9,
            AspectPreset::R10_16 => AspectPreset::R16_10,
            AspectPreset::Custom(w, h) => AspectPreset::Custom(h, w),
            other => other,
        }
    }

    pub fn is_portrait(&self) -> bool {
        match *self {
            AspectPreset::Custom(w, h) => w < h,
            other => Self::PORTRAIT.contains(&other),
        }
    }

    /// Resolves the preset against the image's natural size.
    pub fn ratio(&self, natural_width: u32, natural_height: u32) -> Result<AspectRatio> {
        match *self {
            AspectPreset::Original => AspectRatio::from_sides(natural_width, natural_height),
            AspectPreset::Square => AspectRatio::new(1.0),
            AspectPreset::R3_2 => AspectRatio::new(3.0 / 2.0),
            AspectPreset::R4_3 => AspectRatio::new(4.0 / 3.0),
            AspectPreset::R16_9 => AspectRatio::new(16.0 / 9.0),
            AspectPreset::R16_10 => AspectRatio::new(16.0 / 10.0),
            AspectPreset::R2_3 => AspectRatio::new(2.0 / 3.0),
            AspectPreset::R3_4 => AspectRatio::new(3.0 / 4.0),
            AspectPreset::R9_16 => AspectRatio::new(9.0 / 16.0),
            AspectPreset::R10_16 => AspectRatio::new(10.0 / 16.0),
            AspectPreset::Custom(w, h) => AspectRatio::from_sides(w, h),
        }
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectPreset::Original => write!(f, "Original"),
            AspectPreset::Square => write!(f, "1:1"),
            AspectPreset::R3_2 => write!(f, "3:2"),
            AspectPreset::R4_3 => write!(f, "4:3"),
            AspectPreset::R16_9 => write!(f, "16:9"),
            AspectPreset::R16_10 => write!(f, "16:10"),
            AspectPreset::R2_3 => write!(f, "2:3"),
            AspectPreset::R3_4 => write!(f, "3:4"),
            AspectPreset::R9_16 => write!(f, "9:16"),
            AspectPreset::R10_16 => write!(f, "10:16"),
            AspectPreset::Custom(w, h) => write!(f, "{w}:{h}"),
        }
    }
}

impl FromStr for AspectPreset {
    type Err = CropError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("original") {
            return Ok(AspectPreset::Original);
        }
        let named = [AspectPreset::Square]
            .into_iter()
            .chain(Self::LANDSCAPE)
            .chain(Self::PORTRAIT)
            .find(|p| p.to_string() == s);
        if let Some(preset) = named {
            return Ok(preset);
        }

        let unknown = || CropError::UnknownPreset(s.to_string());
        let (w, h) = s.split_once(':').ok_or_else(unknown)?;
        let w: u32 = w.trim().parse().map_err(|_| unknown())?;
        let h: u32 = h.trim().parse().map_err(|_| unknown())?;
        if w == 0 || h == 0 {
            return Err(unknown());
        }
        Ok(AspectPreset::Custom(w, h))
    }
}
