//! The upload state machine.
//!
//! ```text
//!            submit()                 transfer ok
//!   Idle ─────────────▶ Uploading ─────────────────▶ Success
//!    ▲                   │      │                       │
//!    │      remove() /   │      │ transfer failed       │ remove()
//!    │      cancelled    │      ▼                       │
//!    └───────────────────┘    Error ────────────────────┘
//! ```
//!
//! All state changes happen on the thread that owns the controller. The
//! transfer runs on the tokio runtime and talks back through a channel that
//! [`UploadController::poll`] drains.

use super::progress::ProgressSink;
use super::state::{UploadState, UploadView};
use super::transfer::Transport;
use super::types::{SelectedFile, TransferEvent, UploadStatus};
use crate::config::Config;
use log::{debug, error, info, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

pub struct UploadController {
    state: UploadState,
    transport: Arc<dyn Transport>,
    runtime: Handle,
    events_tx: Sender<TransferEvent>,
    events_rx: Receiver<TransferEvent>,
    label_max_chars: usize,
    extension: String,
}

impl UploadController {
    pub fn new(config: &Config, transport: Arc<dyn Transport>, runtime: Handle) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            state: UploadState::default(),
            transport,
            runtime,
            events_tx,
            events_rx,
            label_max_chars: config.label_max_chars,
            extension: config.accepted.extension.clone(),
        }
    }

    /// Files dropped on the surface. Only the first one is kept.
    pub fn on_drop(&mut self, files: Vec<SelectedFile>) {
        self.select_first(files, "drop");
    }

    /// Files returned by the picker. Only the first one is kept.
    pub fn on_browse(&mut self, files: Vec<SelectedFile>) {
        self.select_first(files, "browse");
    }

    fn select_first(&mut self, files: Vec<SelectedFile>, source: &str) {
        let count = files.len();
        let Some(file) = files.into_iter().next() else {
            debug!("Ignoring empty {} selection", source);
            return;
        };
        if count > 1 {
            debug!("Keeping first of {} files from {}", count, source);
        }

        if self.state.status == UploadStatus::Uploading {
            info!("New file selected mid-upload, cancelling current transfer");
            self.state.cancel_in_flight();
        }
        // Success/Error describe the previous file.
        self.state.status = UploadStatus::Idle;
        self.state.progress = 0;

        info!("Selected '{}' ({} bytes)", file.name(), file.size());
        self.state.file = Some(file);
    }

    /// Starts uploading the selected file.
    ///
    /// Does nothing without a file. A second submit while a transfer is in
    /// flight is rejected rather than queued or restarted.
    pub fn submit(&mut self) {
        let Some(file) = self.state.file.clone() else {
            debug!("Submit ignored: no file selected");
            return;
        };
        if self.state.status == UploadStatus::Uploading {
            warn!("Submit ignored: '{}' is already uploading", file.name());
            return;
        }

        self.state.cancel_in_flight();
        self.state.attempt += 1;
        self.state.status = UploadStatus::Uploading;
        self.state.progress = 0;

        let attempt = self.state.attempt;
        let cancel = CancellationToken::new();
        self.state.cancel = Some(cancel.clone());

        info!("Uploading '{}' (attempt {})", file.name(), attempt);

        let progress_tx = self.events_tx.clone();
        let sink: ProgressSink = Box::new(move |percent| {
            let _ = progress_tx.send(TransferEvent::Progress { attempt, percent });
        });

        let settled_tx = self.events_tx.clone();
        let transport = self.transport.clone();
        self.runtime.spawn(async move {
            let result = transport.upload(file, sink, cancel).await;
            let _ = settled_tx.send(TransferEvent::Settled { attempt, result });
        });
    }

    /// Drops the file and returns to idle, cancelling any transfer first.
    pub fn remove(&mut self) {
        if self.state.clear() {
            info!("Upload cancelled");
        } else {
            debug!("Selection cleared");
        }
    }

    /// Applies every event the transfer has sent since the last call.
    /// Returns whether anything was received.
    pub fn poll(&mut self) -> bool {
        let mut received = false;
        while let Ok(event) = self.events_rx.try_recv() {
            received = true;
            self.apply(event);
        }
        received
    }

    fn apply(&mut self, event: TransferEvent) {
        match event {
            TransferEvent::Progress { attempt, percent } => {
                if !self.is_current(attempt) {
                    return;
                }
                self.state.progress = self.state.progress.max(percent.min(100));
            }
            TransferEvent::Settled { attempt, result } => {
                if !self.is_current(attempt) {
                    debug!("Discarding outcome of stale attempt {}", attempt);
                    return;
                }

                self.state.cancel = None;
                match result {
                    Ok(()) => {
                        self.state.status = UploadStatus::Success;
                        self.state.progress = 100;
                    }
                    Err(e) if e.is_cancelled() => {
                        self.state.status = UploadStatus::Idle;
                        self.state.progress = 0;
                    }
                    Err(e) => {
                        error!("Upload failed: {}", e);
                        self.state.status = UploadStatus::Error;
                        self.state.progress = 0;
                    }
                }
            }
        }
    }

    fn is_current(&self, attempt: u64) -> bool {
        attempt == self.state.attempt && self.state.status == UploadStatus::Uploading
    }

    pub fn status(&self) -> UploadStatus {
        self.state.status
    }

    pub fn progress(&self) -> u8 {
        self.state.progress
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.state.file.as_ref()
    }

    pub fn has_cancel_handle(&self) -> bool {
        self.state.cancel.is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.state.status == UploadStatus::Uploading
    }

    pub fn view(&self) -> UploadView {
        self.state.view(self.label_max_chars, &self.extension)
    }
}
