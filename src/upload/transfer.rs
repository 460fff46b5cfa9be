use super::progress::{ProgressSink, ProgressTracker};
use super::types::SelectedFile;
use crate::config::Config;
use crate::error::{ConfigError, UploadError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Url};
use tokio_util::sync::CancellationToken;

/// Sends one file to the upload endpoint.
///
/// Implementations call `progress` zero or more times with non-decreasing
/// percentages and then return exactly once. Once `cancel` fires the
/// result must be [`UploadError::Cancelled`], even if the exchange had
/// already finished.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn upload(
        &self,
        file: SelectedFile,
        progress: ProgressSink,
        cancel: CancellationToken,
    ) -> Result<(), UploadError>;
}

/// Multipart form field carrying the package.
pub const FILE_FIELD: &str = "file";

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// POSTs the file as `multipart/form-data` with reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    mime: String,
    chunk_size: usize,
}

impl HttpTransport {
    pub fn new(endpoint: Url, mime: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            mime: mime.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.endpoint_url()?, config.accepted.mime.clone()))
    }

    /// Size of the pieces the body is streamed in; progress moves once per piece.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn form(&self, file: &SelectedFile, progress: ProgressSink) -> Result<Form, UploadError> {
        let body = progress_body(file.bytes().clone(), self.chunk_size, progress);
        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name().to_string())
            .mime_str(&self.mime)?;
        Ok(Form::new().part(FILE_FIELD, part))
    }

    async fn exchange(&self, file: &SelectedFile, progress: ProgressSink) -> Result<(), UploadError> {
        let form = self.form(file, progress)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Status(status));
        }

        // The exchange is over once the response body has arrived; its
        // contents are not needed.
        response.bytes().await?;
        Ok(())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn upload(
        &self,
        file: SelectedFile,
        progress: ProgressSink,
        cancel: CancellationToken,
    ) -> Result<(), UploadError> {
        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }

        debug!(
            "Posting '{}' ({} bytes) to {}",
            file.name(),
            file.size(),
            self.endpoint
        );

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UploadError::Cancelled),
            result = self.exchange(&file, progress) => result,
        };

        if cancel.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        if result.is_ok() {
            info!("Uploaded '{}' to {}", file.name(), self.endpoint);
        }
        result
    }
}

struct BodyState {
    bytes: Bytes,
    offset: usize,
    chunk_size: usize,
    tracker: ProgressTracker,
    sink: ProgressSink,
    finished: bool,
}

/// Streams `bytes` in chunks. Each time the next chunk is requested, the
/// previous ones have been taken by the connection, so that is when
/// progress is reported.
fn progress_stream(
    bytes: Bytes,
    chunk_size: usize,
    sink: ProgressSink,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = bytes.len() as u64;
    let state = BodyState {
        bytes,
        offset: 0,
        chunk_size,
        tracker: ProgressTracker::new(Some(total)),
        sink,
        finished: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        if state.finished {
            return None;
        }

        let consumed = state.offset as u64 - state.tracker.sent();
        if let Some(percent) = state.tracker.advance(consumed) {
            (state.sink)(percent);
        }

        if state.offset >= state.bytes.len() {
            state.finished = true;
            return None;
        }

        let end = (state.offset + state.chunk_size).min(state.bytes.len());
        let chunk = state.bytes.slice(state.offset..end);
        state.offset = end;
        Some((Ok::<_, std::io::Error>(chunk), state))
    })
}

fn progress_body(bytes: Bytes, chunk_size: usize, sink: ProgressSink) -> Body {
    Body::wrap_stream(progress_stream(bytes, chunk_size, sink))
}
