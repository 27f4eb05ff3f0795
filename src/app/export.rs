use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::{CareApp, Tab};

#[derive(Debug, Error)]
enum ExportError {
    #[error("the screenshot did not cover the canvas")]
    EmptyRegion,
    #[error("pixel buffer size mismatch")]
    BufferSize,
    #[error("could not write the image: {0}")]
    Write(#[from] image::ImageError),
}

impl CareApp {
    /// Asks the backend for a frame capture. The actual file is written
    /// when the screenshot event arrives, one or two frames later.
    pub(super) fn request_canvas_export(&mut self, ctx: &egui::Context, tab: Tab) {
        self.pending_export = Some(tab);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    pub(super) fn handle_screenshot_events(&mut self, ctx: &egui::Context) {
        let image: Option<Arc<egui::ColorImage>> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    egui::Event::Screenshot { image, .. } => Some(image.clone()),
                    _ => None,
                })
                .last()
        });
        let Some(image) = image else {
            return;
        };
        let Some(tab) = self.pending_export.take() else {
            return;
        };
        let Some(canvas) = self.canvas_rect else {
            self.status = Some("Export failed: no canvas on screen".to_string());
            return;
        };
        // Only the on-screen part of the canvas is captured.
        let crop = canvas.intersect(ctx.content_rect());
        let pixels_per_point = ctx.pixels_per_point();
        match save_region_png(&image, crop, pixels_per_point, tab.export_file_name()) {
            Ok(Some(path)) => {
                log::info!("exported {} to {}", tab.label(), path.display());
                self.status = Some(format!("Saved {}", path.display()));
            }
            Ok(None) => {
                self.status = Some("Export cancelled".to_string());
            }
            Err(e) => {
                log::warn!("export failed: {e}");
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }
}

fn save_region_png(
    image: &egui::ColorImage,
    rect: egui::Rect,
    pixels_per_point: f32,
    file_name: &str,
) -> Result<Option<PathBuf>, ExportError> {
    if !rect.is_positive() {
        return Err(ExportError::EmptyRegion);
    }
    let region = image.region(&rect, Some(pixels_per_point));
    let [width, height] = region.size;
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyRegion);
    }
    let mut bytes = Vec::with_capacity(width * height * 4);
    for pixel in &region.pixels {
        bytes.extend_from_slice(&pixel.to_array());
    }
    let buffer = image::RgbaImage::from_raw(width as u32, height as u32, bytes)
        .ok_or(ExportError::BufferSize)?;

    let Some(path) = rfd::FileDialog::new()
        .set_file_name(file_name)
        .add_filter("PNG image", &["png"])
        .save_file()
    else {
        return Ok(None);
    };
    buffer.save(&path)?;
    Ok(Some(path))
}
