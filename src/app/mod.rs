mod surface;
mod ui;

use crate::config::Config;
use crate::upload::UploadController;
use crate::utils::theme::Palette;
use eframe::{egui, App};
use log::info;
use std::time::Duration;
pub use surface::DropSurface;

pub struct DeckUploader {
    controller: UploadController,
    surface: DropSurface,
    palette: Palette,
}

impl DeckUploader {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config, controller: UploadController) -> Self {
        info!("Starting deck uploader, posting to {}", config.endpoint);
        let palette = Palette::default();
        palette.apply(&cc.egui_ctx);
        Self {
            controller,
            surface: DropSurface::new(config.accepted.clone()),
            palette,
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        let dropped = self.surface.update(ctx);
        if !dropped.is_empty() {
            self.controller.on_drop(dropped);
        }

        if self.controller.poll() {
            ctx.request_repaint();
        }
        // Transfer events arrive off the UI thread; keep polling while one runs.
        if self.controller.is_uploading() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

impl App for DeckUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
