use crate::config::AcceptedType;
use crate::upload::SelectedFile;
use bytes::Bytes;
use eframe::egui::{self, DroppedFile};
use glob::{MatchOptions, Pattern};
use log::{debug, warn};
use rfd::FileDialog;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Drop target and file picker.
///
/// Dropped files are filtered by the accepted extension, or by MIME type
/// when the platform reports one, before the controller sees them, the way a browser drop zone only reports accepted
/// files. The filter is advisory: the picker still lets users choose
/// "All files" on some platforms.
pub struct DropSurface {
    accepted: AcceptedType,
    pattern: Option<Pattern>,
    drag_active: bool,
}

impl DropSurface {
    pub fn new(accepted: AcceptedType) -> Self {
        let pattern = match Pattern::new(&accepted.glob_pattern()) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Accepting any file, bad pattern for {}: {}", accepted.extension, e);
                None
            }
        };
        Self {
            accepted,
            pattern,
            drag_active: false,
        }
    }

    pub fn accepted(&self) -> &AcceptedType {
        &self.accepted
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.pattern
            .as_ref()
            .map_or(true, |pattern| pattern.matches_with(name, MATCH_OPTIONS))
    }

    /// MIME types are case-insensitive; an empty one means the platform
    /// did not say.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        !mime.is_empty() && mime.eq_ignore_ascii_case(&self.accepted.mime)
    }

    /// True while files are hovering the window.
    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Reads this frame's hover state and returns the accepted files that
    /// were dropped, in drop order.
    pub fn update(&mut self, ctx: &egui::Context) -> Vec<SelectedFile> {
        let (hovering, dropped) =
            ctx.input(|i| (!i.raw.hovered_files.is_empty(), i.raw.dropped_files.clone()));
        self.drag_active = hovering;

        if !dropped.is_empty() {
            debug!("{} file(s) dropped", dropped.len());
        }
        dropped
            .iter()
            .filter_map(|file| self.load_dropped(file))
            .collect()
    }

    fn load_dropped(&self, file: &DroppedFile) -> Option<SelectedFile> {
        let name = match &file.path {
            Some(path) if file.name.is_empty() => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _ => file.name.clone(),
        };

        if !self.accepts_mime(&file.mime) && !self.accepts(&name) {
            debug!("Rejected '{}': not a {} file", name, self.accepted.extension);
            return None;
        }

        if let Some(bytes) = &file.bytes {
            return Some(SelectedFile::new(name, Bytes::from_owner(bytes.clone())));
        }
        let path = file.path.as_ref()?;
        match SelectedFile::from_path(path) {
            Ok(selected) => Some(selected),
            Err(e) => {
                warn!("Could not read dropped file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Opens the native picker. Returns zero or one file.
    pub fn browse(&self) -> Vec<SelectedFile> {
        let Some(path) = FileDialog::new()
            .add_filter("Anki deck package", &[self.accepted.bare_extension()])
            .pick_file()
        else {
            return Vec::new();
        };

        match SelectedFile::from_path(&path) {
            Ok(file) => vec![file],
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    fn surface() -> DropSurface {
        DropSurface::new(AcceptedType::default())
    }

    fn frame(ctx: &egui::Context, input: egui::RawInput, surface: &mut DropSurface) -> Vec<SelectedFile> {
        ctx.begin_frame(input);
        let files = surface.update(ctx);
        let _ = ctx.end_frame();
        files
    }

    #[test]
    fn matches_extension_case_insensitively() {
        let surface = surface();
        assert!(surface.accepts("deck.apkg"));
        assert!(surface.accepts("Deck.APKG"));
        assert!(!surface.accepts("deck.apkg.zip"));
        assert!(!surface.accepts("notes.txt"));
    }

    #[test]
    fn drops_keep_order_and_skip_other_types() {
        let ctx = egui::Context::default();
        let mut surface = surface();
        let mut input = egui::RawInput::default();
        for name in ["a.apkg", "readme.txt", "b.apkg"] {
            input.dropped_files.push(DroppedFile {
                name: name.to_string(),
                bytes: Some(Arc::from(vec![1u8, 2, 3])),
                ..Default::default()
            });
        }

        let files = frame(&ctx, input, &mut surface);
        let names: Vec<_> = files.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["a.apkg", "b.apkg"]);
        assert_eq!(files[0].size(), 3);
    }

    #[test]
    fn matching_mime_is_accepted_without_extension() {
        let ctx = egui::Context::default();
        let mut surface = surface();
        let mut input = egui::RawInput::default();
        input.dropped_files.push(DroppedFile {
            name: "deck_export".to_string(),
            mime: "Application/VND.anki.package".to_string(),
            bytes: Some(Arc::from(vec![9u8; 5])),
            ..Default::default()
        });
        input.dropped_files.push(DroppedFile {
            name: "deck_notes".to_string(),
            mime: "text/plain".to_string(),
            bytes: Some(Arc::from(vec![1u8])),
            ..Default::default()
        });

        let files = frame(&ctx, input, &mut surface);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "deck_export");
        assert_eq!(files[0].size(), 5);
    }

    #[test]
    fn glob_characters_in_extension_match_literally() {
        let accepted = AcceptedType::new("application/x-deck", ".ap[kg").unwrap();
        let surface = DropSurface::new(accepted);
        assert!(surface.accepts("deck.ap[kg"));
        assert!(!surface.accepts("deck.apk"));
        assert!(!surface.accepts("notes.txt"));
    }

    #[test]
    fn dropped_path_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("french.apkg");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"deck")
            .unwrap();

        let ctx = egui::Context::default();
        let mut surface = surface();
        let mut input = egui::RawInput::default();
        input.dropped_files.push(DroppedFile {
            path: Some(path),
            ..Default::default()
        });

        let files = frame(&ctx, input, &mut surface);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "french.apkg");
        assert_eq!(files[0].size(), 4);
    }

    #[test]
    fn hover_sets_drag_active() {
        let ctx = egui::Context::default();
        let mut surface = surface();

        let mut input = egui::RawInput::default();
        input.hovered_files.push(egui::HoveredFile::default());
        assert!(frame(&ctx, input, &mut surface).is_empty());
        assert!(surface.is_drag_active());

        frame(&ctx, egui::RawInput::default(), &mut surface);
        assert!(!surface.is_drag_active());
    }
}
