mod controller;
mod progress;
mod state;
mod transfer;
mod types;

pub use controller::UploadController;
pub use progress::{percent, ProgressSink, ProgressTracker};
pub use state::{FileView, UploadState, UploadView};
pub use transfer::{HttpTransport, Transport, FILE_FIELD};
pub use types::{SelectedFile, UploadStatus};
