#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use eframe::egui;
use image::DynamicImage;
use invitation_cropper::{
    AspectPreset, CropEditor, CropRecord, EditorConfig, ImageFraming, ImageGeometry, view,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Aspect-locked crop editor for invitation photos
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Image to open on startup
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Target aspect ratio: "original", a preset like "3:4", or any "w:h"
    #[arg(short, long, default_value = "3:4")]
    aspect: AspectPreset,

    /// Stored framing to start from, as JSON (crop box or legacy scale/position)
    #[arg(long)]
    crop: Option<String>,

    /// Editor configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "invitation_cropper=trace"
    #[arg(long, default_value = "warn")]
    log_level: String,
}

struct InvitationCropper {
    image: Option<DynamicImage>,
    texture: Option<egui::TextureHandle>,
    editor: CropEditor,
    preset: AspectPreset,
    custom_w: u32,
    custom_h: u32,
    /// Stands in for the invitation document the record is saved into.
    record: Rc<RefCell<Option<CropRecord>>>,
    pending_framing: Option<ImageFraming>,
}

impl InvitationCropper {
    fn new(mut editor: CropEditor, preset: AspectPreset, pending_framing: Option<ImageFraming>) -> Self {
        let record = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&record);
        editor.set_on_change(move |rect| {
            info!(?rect, "crop saved");
            *sink.borrow_mut() = Some(CropRecord::from(*rect));
        });

        let (custom_w, custom_h) = match preset {
            AspectPreset::Custom(w, h) => (w, h),
            _ => (4, 3),
        };
        Self {
            image: None,
            texture: None,
            editor,
            preset,
            custom_w,
            custom_h,
            record,
            pending_framing,
        }
    }

    fn open(&mut self, ctx: &egui::Context, path: &Path) {
        let img = match image::open(path) {
            Ok(img) => img,
            Err(e) => {
                error!(path = %path.display(), "failed to open image: {e}");
                return;
            }
        };
        info!(path = %path.display(), width = img.width(), height = img.height(), "image opened");
        let geometry = ImageGeometry::new(img.width(), img.height());
        self.image = Some(img);
        self.load_texture(ctx);

        self.editor.unload();
        self.apply_preset();

        let persisted = self.pending_framing.take().and_then(|framing| {
            framing.to_crop_rect(geometry, self.editor.aspect_ratio(), &self.editor.config().bounds())
        });
        self.editor.load_image(geometry, persisted);
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        if let Some(image) = &self.image {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture = Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn apply_preset(&mut self) {
        let (w, h) = self
            .image
            .as_ref()
            .map_or((1, 1), |image| (image.width(), image.height()));
        let result = self
            .preset
            .ratio(w, h)
            .and_then(|ratio| self.editor.set_aspect_ratio(ratio.get()));
        if let Err(e) = result {
            warn!(preset = %self.preset, "cannot apply aspect preset: {e}");
        }
    }

    fn save_cropped(&self) {
        let (Some(image), Some(rect)) = (&self.image, self.editor.committed()) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
            .save_file()
        else {
            return;
        };
        let (x, y, width, height) = rect.to_pixels(image.width(), image.height());
        let cropped = image.crop_imm(x, y, width, height);
        match cropped.save(&path) {
            Ok(()) => info!(path = %path.display(), width, height, "cropped image saved"),
            Err(e) => error!(path = %path.display(), "failed to save image: {e}"),
        }
    }

    fn preset_picker(&mut self, ui: &mut egui::Ui) {
        ui.label("Aspect Ratio:");
        let mut changed = false;
        egui::ComboBox::from_id_salt("params_aspect_ratio")
            .selected_text(self.preset.to_string())
            .show_ui(ui, |ui| {
                changed |= ui
                    .selectable_value(&mut self.preset, AspectPreset::Original, "Original")
                    .changed();
                changed |= ui
                    .selectable_value(&mut self.preset, AspectPreset::Square, "1:1")
                    .changed();

                ui.separator();
                let presets = if self.preset.is_portrait() {
                    AspectPreset::PORTRAIT
                } else {
                    AspectPreset::LANDSCAPE
                };
                for preset in presets {
                    changed |= ui
                        .selectable_value(&mut self.preset, preset, preset.to_string())
                        .changed();
                }

                ui.separator();
                let custom = AspectPreset::Custom(self.custom_w, self.custom_h);
                changed |= ui.selectable_value(&mut self.preset, custom, "Custom").changed();
            });

        if ui.button("🔄").clicked() {
            self.preset = self.preset.counterpart();
            if let AspectPreset::Custom(w, h) = self.preset {
                (self.custom_w, self.custom_h) = (w, h);
            }
            changed = true;
        }

        if let AspectPreset::Custom(..) = self.preset {
            changed |= ui
                .add(egui::DragValue::new(&mut self.custom_w).speed(0.1).range(1..=100))
                .changed();
            ui.label(":");
            changed |= ui
                .add(egui::DragValue::new(&mut self.custom_h).speed(0.1).range(1..=100))
                .changed();
            self.preset = AspectPreset::Custom(self.custom_w, self.custom_h);
        }

        if changed {
            self.apply_preset();
        }
    }
}

impl eframe::App for InvitationCropper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|file| file.path.clone()));
        if let Some(path) = dropped {
            self.open(ctx, &path);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("Open Image").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Image", &["png", "jpg", "jpeg", "bmp"])
                    .pick_file()
                {
                    self.open(ctx, &path);
                }
            }

            if self.texture.is_some() {
                ui.horizontal(|ui| {
                    self.preset_picker(ui);

                    if ui.button("Reset").clicked() {
                        self.editor.reset();
                    }
                    if ui.button("Save Cropped Image").clicked() {
                        self.save_cropped();
                    }
                });

                if let Some(record) = *self.record.borrow() {
                    let json = serde_json::to_string(&record).unwrap_or_default();
                    ui.monospace(json);
                }
                ui.separator();
            }

            if let Some(texture) = &self.texture {
                view::show(ui, &mut self.editor, texture);
            }
        });
    }
}

fn main() -> eframe::Result {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path).unwrap_or_else(|e| {
            error!("{e}");
            std::process::exit(2);
        }),
        None => EditorConfig::default(),
    };
    let pending_framing = cli.crop.as_deref().and_then(|raw| match ImageFraming::from_json(raw) {
        Ok(framing) => Some(framing),
        Err(e) => {
            warn!("ignoring --crop: {e}");
            None
        }
    });

    // Original resolves against the image once one is opened.
    let initial_ratio = cli.aspect.ratio(1, 1).map_or(1.0, |ratio| ratio.get());
    let editor = CropEditor::new(initial_ratio, config).unwrap_or_else(|e| {
        error!("{e}");
        std::process::exit(2);
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([800.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Invitation Cropper",
        options,
        Box::new(move |cc| {
            let mut app = InvitationCropper::new(editor, cli.aspect, pending_framing);
            if let Some(path) = &cli.image {
                app.open(&cc.egui_ctx, path);
            }
            Ok(Box::new(app))
        }),
    )
}
