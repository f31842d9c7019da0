//! egui rendering of the crop editor and translation of egui drags into
//! editor gestures.

use eframe::egui;

use crate::editor::CropEditor;
use crate::geometry::{DisplayBox, Point, Size};
use crate::rect::CropRect;
use crate::solver::ResizeHandle;

/// Corners first, then the body. Edges are not handles.
pub fn hit_test(pos: egui::Pos2, rect: egui::Rect, tolerance: f32) -> Option<ResizeHandle> {
    let min = rect.min;
    let max = rect.max;

    if pos.distance(min) < tolerance {
        return Some(ResizeHandle::TopLeft);
    }
    if pos.distance(egui::pos2(max.x, min.y)) < tolerance {
        return Some(ResizeHandle::TopRight);
    }
    if pos.distance(egui::pos2(min.x, max.y)) < tolerance {
        return Some(ResizeHandle::BottomLeft);
    }
    if pos.distance(max) < tolerance {
        return Some(ResizeHandle::BottomRight);
    }

    if rect.contains(pos) {
        return Some(ResizeHandle::Center);
    }

    None
}

pub fn cursor_for(handle: ResizeHandle) -> egui::CursorIcon {
    match handle {
        ResizeHandle::TopLeft | ResizeHandle::BottomRight => egui::CursorIcon::ResizeNwSe,
        ResizeHandle::TopRight | ResizeHandle::BottomLeft => egui::CursorIcon::ResizeNeSw,
        ResizeHandle::Center => egui::CursorIcon::Grab,
    }
}

/// Screen rect of a normalized crop rect inside the displayed image box.
pub fn screen_rect(display: &DisplayBox, rect: &CropRect) -> egui::Rect {
    let min = display.to_screen(Point::new(rect.x, rect.y));
    let max = display.to_screen(Point::new(rect.right(), rect.bottom()));
    egui::Rect::from_min_max(to_pos(min), to_pos(max))
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(pos.x as f64, pos.y as f64)
}

fn to_pos(point: Point) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

/// Draws the image with the crop overlay and feeds pointer input to the
/// editor. Returns the rect committed during this frame, if any.
pub fn show(ui: &mut egui::Ui, editor: &mut CropEditor, texture: &egui::TextureHandle) -> Option<CropRect> {
    let geometry = editor.geometry()?;
    let padding = editor.config().padding;
    let tolerance = editor.config().hit_tolerance;
    let handle_radius = editor.config().handle_radius;

    let available_size = ui.available_size();
    let max_size = available_size - egui::vec2(padding * 2.0, padding * 2.0);
    let display = geometry.display_size(
        Size::new(max_size.x as f64, max_size.y as f64),
        editor.config().max_display_aspect,
    );
    editor.set_container_size(display);
    let display_size = egui::vec2(display.width as f32, display.height as f32);

    let total_display_size = display_size + egui::vec2(padding * 2.0, padding * 2.0);

    // Manual centering
    let x_offset = (available_size.x - total_display_size.x) / 2.0;
    let y_offset = (available_size.y - total_display_size.y) / 2.0;
    let start_pos = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));

    let target_rect = egui::Rect::from_min_size(start_pos, total_display_size);
    let response = ui.allocate_rect(target_rect, egui::Sense::drag());
    let painter = ui.painter_at(target_rect);

    let image_rect = egui::Rect::from_min_size(target_rect.min + egui::vec2(padding, padding), display_size);
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    let display_box = DisplayBox::new(to_point(image_rect.min), display);
    let mut committed = None;

    if response.drag_started() {
        let origin = ui
            .input(|i| i.pointer.press_origin())
            .or_else(|| response.interact_pointer_pos());
        if let (Some(origin), Some(rect)) = (origin, editor.rect()) {
            if let Some(handle) = hit_test(origin, screen_rect(&display_box, &rect), tolerance) {
                editor.pointer_down(handle, to_point(origin));
            }
        }
    }

    if editor.is_dragging() {
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                editor.pointer_move(to_point(pos));
            }
        }
        let (escape, focused) = ui.input(|i| (i.key_pressed(egui::Key::Escape), i.focused));
        if escape || !focused {
            editor.pointer_cancel();
        }
    }

    if response.drag_stopped() {
        committed = editor.pointer_up();
    }

    let Some(rect) = editor.rect() else {
        return committed;
    };
    let screen_crop_rect = screen_rect(&display_box, &rect);

    let hovered = editor.active_handle().or_else(|| {
        response
            .hover_pos()
            .and_then(|pos| hit_test(pos, screen_crop_rect, tolerance))
    });
    if let Some(handle) = hovered {
        ui.ctx().set_cursor_icon(cursor_for(handle));
    }

    paint_overlay(&painter, image_rect, screen_crop_rect);
    paint_handles(&painter, screen_crop_rect, handle_radius);

    committed
}

fn paint_overlay(painter: &egui::Painter, image_rect: egui::Rect, crop: egui::Rect) {
    let overlay_color = egui::Color32::from_black_alpha(150);

    // Top
    painter.rect_filled(
        egui::Rect::from_min_max(image_rect.min, egui::pos2(image_rect.max.x, crop.min.y)),
        0.0,
        overlay_color,
    );
    // Bottom
    painter.rect_filled(
        egui::Rect::from_min_max(egui::pos2(image_rect.min.x, crop.max.y), image_rect.max),
        0.0,
        overlay_color,
    );
    // Left
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, crop.min.y),
            egui::pos2(crop.min.x, crop.max.y),
        ),
        0.0,
        overlay_color,
    );
    // Right
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(crop.max.x, crop.min.y),
            egui::pos2(image_rect.max.x, crop.max.y),
        ),
        0.0,
        overlay_color,
    );

    painter.rect_stroke(crop, 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE));
}

fn paint_handles(painter: &egui::Painter, crop: egui::Rect, radius: f32) {
    let stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
    let fill = egui::Color32::WHITE;

    for pos in [crop.left_top(), crop.right_top(), crop.left_bottom(), crop.right_bottom()] {
        painter.circle(pos, radius, fill, stroke);
    }
}
