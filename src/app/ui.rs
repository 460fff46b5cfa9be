use super::DeckUploader;
use crate::upload::{UploadStatus, UploadView};
use crate::utils::theme::Palette;
use eframe::egui::{self, Color32, RichText, Sense, Stroke};

/// What the user asked for during this frame; applied after drawing.
#[derive(Default)]
struct Actions {
    browse: bool,
    remove: bool,
    submit: bool,
}

impl DeckUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        let view = self.controller.view();
        let palette = self.palette;
        let drag_active = self.surface.is_drag_active();
        let extension = self.surface.accepted().extension.clone();
        let mut actions = Actions::default();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("UPLOAD FILES").strong().color(palette.fourth));
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Upload anki flashcards ({} files)", extension))
                        .small()
                        .color(palette.fourth),
                );
            });

            ui.add_space(32.0);
            let width = ui.available_width() * 0.8;
            ui.vertical_centered(|ui| {
                ui.set_max_width(width);
                render_drop_zone(ui, &palette, drag_active, &mut actions);
                ui.add_space(32.0);
                render_file_section(ui, &palette, &view, &mut actions);
            });
        });

        if actions.browse {
            let files = self.surface.browse();
            self.controller.on_browse(files);
        }
        if actions.remove {
            self.controller.remove();
        }
        if actions.submit {
            self.controller.submit();
        }
    }
}

fn render_drop_zone(ui: &mut egui::Ui, palette: &Palette, drag_active: bool, actions: &mut Actions) {
    let border = if drag_active {
        palette.third
    } else {
        palette.drop_zone_border
    };

    let zone = egui::Frame::none()
        .fill(palette.drop_zone)
        .stroke(Stroke::new(2.0, border))
        .rounding(8.0)
        .inner_margin(16.0)
        .show(ui, |ui| {
            ui.set_min_size(egui::vec2(ui.available_width(), 160.0));
            ui.vertical_centered(|ui| {
                ui.add_space(8.0);
                ui.label(RichText::new("📤").size(40.0).color(palette.second));
                let prompt = if drag_active {
                    "Drop the files here ..."
                } else {
                    "Drag 'n' drop your anki deck"
                };
                ui.label(RichText::new(prompt).color(palette.third));
                ui.label(RichText::new("or").color(palette.third));
                let browse = egui::Button::new(RichText::new("Browse Files").color(palette.first))
                    .fill(palette.third);
                if ui.add(browse).clicked() {
                    actions.browse = true;
                }
            });
        });

    if zone.response.interact(Sense::click()).clicked() {
        actions.browse = true;
    }
}

fn render_file_section(ui: &mut egui::Ui, palette: &Palette, view: &UploadView, actions: &mut Actions) {
    ui.with_layout(egui::Layout::top_down(egui::Align::Min), |ui| {
        ui.label(RichText::new("Uploaded File").small().color(palette.fourth));
        ui.add_space(8.0);

        if let Some(file) = &view.file {
            ui.horizontal(|ui| {
                ui.label(RichText::new("🗂").size(28.0).color(palette.third));
                ui.vertical(|ui| {
                    ui.label(RichText::new(&file.label).color(palette.fourth))
                        .on_hover_text(file.name.as_str());
                    ui.label(RichText::new(&file.size).small().color(palette.second));
                    let bar = egui::ProgressBar::new(f32::from(view.progress) / 100.0)
                        .desired_width(ui.available_width().min(220.0))
                        .fill(palette.third);
                    ui.add(bar);
                });
                ui.label(format!("{}%", view.progress));

                if view.status == UploadStatus::Success {
                    ui.label(
                        RichText::new(" ✔ ")
                            .color(Color32::WHITE)
                            .background_color(palette.success),
                    );
                } else {
                    let remove = if view.status == UploadStatus::Error {
                        egui::Button::new(RichText::new("✖").color(Color32::WHITE)).fill(palette.sixth)
                    } else {
                        egui::Button::new(RichText::new("✖").color(palette.fourth)).frame(false)
                    };
                    if ui.add(remove).on_hover_text("Remove").clicked() {
                        actions.remove = true;
                    }
                }
            });
            ui.add_space(16.0);
        }

        let submit = egui::Button::new(RichText::new("Submit").color(palette.first))
            .fill(palette.third)
            .min_size(egui::vec2(ui.available_width(), 44.0));
        if ui.add_enabled(view.can_submit, submit).clicked() {
            actions.submit = true;
        }

        ui.add_space(8.0);
        if let Some(message) = view.status.message() {
            let color = match view.status {
                UploadStatus::Success => palette.success,
                UploadStatus::Error => palette.sixth,
                _ => palette.fourth,
            };
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(message).small().color(color));
            });
        }
    });
}
