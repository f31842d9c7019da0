use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};
use crate::rect::{MAX_SIZE, MIN_SIZE, SizeBounds};
use crate::solver::ResizeRule;

/// Tunables for the crop editor and its egui view. Every field has a
/// default, so a config file only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub min_size: f64,
    pub max_size: f64,
    /// Cap on each side of the rect the initializer produces. Follows
    /// `max_size` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_init_size: Option<f64>,
    pub resize_rule: ResizeRule,
    /// Corner handle radius, in screen points.
    pub handle_radius: f32,
    /// Distance from a corner that still grabs it, in screen points.
    pub hit_tolerance: f32,
    /// The displayed image box is never wider than this times its height.
    pub max_display_aspect: f64,
    pub padding: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_size: MIN_SIZE,
            max_size: MAX_SIZE,
            max_init_size: None,
            resize_rule: ResizeRule::default(),
            handle_radius: 6.0,
            hit_tolerance: 10.0,
            max_display_aspect: 1.5,
            padding: 20.0,
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| CropError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn bounds(&self) -> SizeBounds {
        SizeBounds {
            min: self.min_size,
            max: self.max_size,
        }
    }

    pub fn init_size(&self) -> f64 {
        self.max_init_size.unwrap_or(self.max_size)
    }

    pub fn validate(&self) -> Result<()> {
        self.bounds().validate()?;
        if let Some(size) = self.max_init_size {
            // NaN fails both comparisons.
            if !(size >= self.min_size && size <= self.max_size) {
                return Err(CropError::InvalidConfig(format!(
                    "max_init_size must be within [{}, {}], got {size}",
                    self.min_size, self.max_size
                )));
            }
        }
        if !(self.max_display_aspect.is_finite() && self.max_display_aspect > 0.0) {
            return Err(CropError::InvalidConfig(format!(
                "max_display_aspect must be positive, got {}",
                self.max_display_aspect
            )));
        }
        if self.hit_tolerance < 0.0 || self.handle_radius < 0.0 || self.padding < 0.0 {
            return Err(CropError::InvalidConfig(
                "hit_tolerance, handle_radius and padding must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
