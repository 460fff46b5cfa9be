use super::types::{SelectedFile, UploadStatus};
use crate::utils::file_size::format_size;
use crate::utils::label::display_label;
use tokio_util::sync::CancellationToken;

/// Everything the upload controller owns. Only the controller mutates it;
/// the UI reads it through [`UploadView`].
#[derive(Debug, Default)]
pub struct UploadState {
    pub file: Option<SelectedFile>,
    pub status: UploadStatus,
    /// Percentage, 0..=100.
    pub progress: u8,
    /// Present exactly while `status` is `Uploading`.
    pub cancel: Option<CancellationToken>,
    /// Bumped on every submit; events from older attempts are stale.
    pub attempt: u64,
}

impl UploadState {
    /// Returns to idle, dropping the file. Cancels the in-flight transfer
    /// if there is one and reports whether it did.
    pub fn clear(&mut self) -> bool {
        let cancelled = self.cancel_in_flight();
        self.file = None;
        self.status = UploadStatus::Idle;
        self.progress = 0;
        cancelled
    }

    pub fn cancel_in_flight(&mut self) -> bool {
        match self.cancel.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn view(&self, label_max_chars: usize, extension: &str) -> UploadView {
        UploadView {
            file: self.file.as_ref().map(|file| FileView {
                name: file.name().to_string(),
                label: display_label(file.name(), label_max_chars, extension),
                size: format_size(file.size()),
            }),
            status: self.status,
            progress: self.progress,
            can_submit: self.file.is_some() && self.status != UploadStatus::Uploading,
        }
    }
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub file: Option<FileView>,
    pub status: UploadStatus,
    pub progress: u8,
    pub can_submit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    pub name: String,
    pub label: String,
    pub size: String,
}
