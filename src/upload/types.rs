use crate::error::UploadError;
use bytes::Bytes;
use derivative::Derivative;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    /// Status line shown under the Submit button.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            UploadStatus::Idle => None,
            UploadStatus::Uploading => Some("Uploading..."),
            UploadStatus::Success => Some("Success!"),
            UploadStatus::Error => Some("Error!"),
        }
    }
}

/// The one file staged for upload.
#[derive(Derivative, Clone, PartialEq, Eq)]
#[derivative(Debug)]
pub struct SelectedFile {
    name: String,
    #[derivative(Debug = "ignore")]
    bytes: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
            })?;
        let bytes = fs::read(path)?;
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

/// Messages from a running transfer back to the UI thread.
#[derive(Debug)]
pub(crate) enum TransferEvent {
    Progress { attempt: u64, percent: u8 },
    Settled {
        attempt: u64,
        result: Result<(), UploadError>,
    },
}
