//! One crop editor per image: owns the committed rect, the working rect
//! shown during a drag, and the drag session.

use std::fmt;

use tracing::{debug, trace, warn};

use crate::aspect::AspectRatio;
use crate::config::EditorConfig;
use crate::drag::DragController;
use crate::error::Result;
use crate::geometry::{ImageGeometry, Point, Size};
use crate::init::initial_rect;
use crate::rect::CropRect;
use crate::solver::{ConstraintSolver, ResizeHandle};

/// Called with the new rect on every commit.
pub type OnChange = Box<dyn FnMut(&CropRect)>;

pub struct CropEditor {
    config: EditorConfig,
    ratio: AspectRatio,
    geometry: Option<ImageGeometry>,
    solver: Option<ConstraintSolver>,
    container: Size,
    committed: Option<CropRect>,
    working: Option<CropRect>,
    drag: DragController,
    on_change: Option<OnChange>,
}

impl fmt::Debug for CropEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropEditor")
            .field("ratio", &self.ratio)
            .field("geometry", &self.geometry)
            .field("container", &self.container)
            .field("committed", &self.committed)
            .field("working", &self.working)
            .field("drag", &self.drag)
            .finish_non_exhaustive()
    }
}

impl CropEditor {
    /// Fails on a non-positive aspect ratio or an invalid config.
    pub fn new(aspect_ratio: f64, config: EditorConfig) -> Result<Self> {
        let ratio = AspectRatio::new(aspect_ratio)?;
        config.validate()?;
        Ok(Self {
            config,
            ratio,
            geometry: None,
            solver: None,
            container: Size::default(),
            committed: None,
            working: None,
            drag: DragController::default(),
            on_change: None,
        })
    }

    pub fn with_on_change(mut self, on_change: impl FnMut(&CropRect) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    pub fn set_on_change(&mut self, on_change: impl FnMut(&CropRect) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.ratio
    }

    pub fn geometry(&self) -> Option<ImageGeometry> {
        self.geometry
    }

    /// Inert until an image with non-zero natural size is loaded.
    pub fn is_inert(&self) -> bool {
        self.solver.is_none()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn active_handle(&self) -> Option<ResizeHandle> {
        self.drag.active_handle()
    }

    /// The rect to display: the drag candidate while dragging, otherwise
    /// the committed rect.
    pub fn rect(&self) -> Option<CropRect> {
        self.working.or(self.committed)
    }

    pub fn committed(&self) -> Option<CropRect> {
        self.committed
    }

    /// Swaps in a new image. Any running gesture is dropped. A persisted
    /// rect is re-clamped, refitted if it was saved under another aspect
    /// ratio, and reused; without one the initializer runs and its result
    /// is committed. Returns the rect now in effect.
    pub fn load_image(&mut self, geometry: ImageGeometry, persisted: Option<CropRect>) -> Option<CropRect> {
        self.drag.cancel();
        self.working = None;
        self.committed = None;

        if !geometry.is_known() {
            warn!(
                width = geometry.natural_width,
                height = geometry.natural_height,
                "image has no size yet, crop editor stays inert"
            );
            self.geometry = None;
            self.solver = None;
            return None;
        }
        self.geometry = Some(geometry);
        self.rebuild_solver();

        let (Some(stored), Some(solver)) = (persisted, self.solver) else {
            return self.reset();
        };
        let mut rect = stored.sanitized(&self.config.bounds());
        if rect != stored {
            warn!(?stored, ?rect, "persisted crop rect was out of range, re-clamped");
        }
        if !solver.is_locked(&rect) {
            let refit = solver.refit(&rect);
            warn!(?rect, ?refit, "persisted crop rect has another aspect ratio, refitted");
            rect = refit;
        }
        self.committed = Some(rect);
        Some(rect)
    }

    /// Drops the image; the editor becomes inert.
    pub fn unload(&mut self) {
        self.drag.cancel();
        self.geometry = None;
        self.solver = None;
        self.committed = None;
        self.working = None;
    }

    /// Size of the on-screen image box, used to normalize pointer deltas.
    pub fn set_container_size(&mut self, container: Size) {
        self.container = container;
    }

    /// Changes the target ratio and refits the committed rect around its
    /// center. A running gesture is cancelled.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f64) -> Result<Option<CropRect>> {
        self.ratio = AspectRatio::new(aspect_ratio)?;
        self.pointer_cancel();
        self.rebuild_solver();

        let (Some(solver), Some(current)) = (self.solver, self.committed) else {
            return Ok(None);
        };
        let rect = solver.refit(&current);
        self.commit(rect);
        Ok(Some(rect))
    }

    /// Starts a gesture on the body (`Center`) or a corner handle. Ignored
    /// while inert, while the container is unmeasured, or if a gesture is
    /// already active.
    pub fn pointer_down(&mut self, handle: ResizeHandle, pointer: Point) -> bool {
        let Some(current) = self.committed else {
            return false;
        };
        if self.is_inert() || !self.container.is_measured() {
            return false;
        }
        let started = self.drag.begin(handle, pointer, current);
        if started {
            debug!(handle = handle.as_str(), ?current, "crop drag started");
        }
        started
    }

    /// Updates the working rect. Nothing is persisted.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<CropRect> {
        let solver = self.solver?;
        let candidate = self.drag.update(pointer, self.container, &solver)?;
        trace!(?candidate, "crop candidate");
        self.working = Some(candidate);
        Some(candidate)
    }

    /// Ends the gesture and commits its last candidate, if any.
    pub fn pointer_up(&mut self) -> Option<CropRect> {
        self.working = None;
        let candidate = self.drag.finish()?;
        self.commit(candidate);
        Some(candidate)
    }

    /// Pointer-cancel, touch-cancel or focus loss: ends the gesture and
    /// keeps the last committed rect.
    pub fn pointer_cancel(&mut self) {
        if self.drag.cancel() {
            debug!(committed = ?self.committed, "crop drag cancelled");
        }
        self.working = None;
    }

    /// Recomputes the initial centered rect, ignoring the current one, and
    /// commits it straight away.
    pub fn reset(&mut self) -> Option<CropRect> {
        self.pointer_cancel();
        let rect = initial_rect(self.geometry?, self.ratio, self.config.init_size())?;
        self.commit(rect);
        Some(rect)
    }

    fn commit(&mut self, rect: CropRect) {
        debug!(?rect, "crop committed");
        self.committed = Some(rect);
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&rect);
        }
    }

    fn rebuild_solver(&mut self) {
        self.solver = self.geometry.map(|geometry| {
            ConstraintSolver::new(self.ratio, geometry, self.config.bounds(), self.config.resize_rule)
        });
    }
}
