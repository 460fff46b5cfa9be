//! Desktop uploader for Anki deck packages.
//!
//! The user drops or picks one `.apkg` file and sends it to a fixed HTTP
//! endpoint as multipart form data, with progress, cancellation and a
//! success/error indicator.
//!
//! - [`upload`] - state machine, transfer and progress reporting
//! - [`app`] - the eframe window: drop surface and rendering
//! - [`config`] - defaults, config file and command-line flags

pub mod app;
pub mod config;
pub mod error;
pub mod upload;
pub mod utils;

pub use config::{AcceptedType, Args, Config};
pub use error::{ConfigError, UploadError};
