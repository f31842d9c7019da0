//! Aspect-locked crop region editor for invitation photos.
//!
//! The engine works in coordinates normalized to the image's natural pixel
//! box. [`CropEditor`] owns one rect per image: it initializes it, drives
//! move/corner-resize gestures through the [`ConstraintSolver`], and reports
//! each committed rect through a callback. The [`view`] module renders it
//! with egui.

pub mod aspect;
pub mod config;
pub mod drag;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod init;
pub mod persist;
pub mod rect;
pub mod solver;
pub mod view;

pub use aspect::{AspectPreset, AspectRatio};
pub use config::EditorConfig;
pub use editor::CropEditor;
pub use error::{CropError, Result};
pub use geometry::{ImageGeometry, Point, Size};
pub use persist::{CropRecord, ImageFraming, ScalePosition};
pub use rect::{CropRect, SizeBounds};
pub use solver::{ConstraintSolver, ResizeHandle, ResizeRule};
