//! Application configuration.
//!
//! Defaults match the stock Anki upload form. A JSON file can override any
//! subset of fields, and command-line flags override the file.

use crate::error::ConfigError;
use clap::Parser;
use glob::Pattern;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where packages are posted when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "https://httpbin.org/post";

pub const DEFAULT_MIME: &str = "application/vnd.anki.package";

pub const DEFAULT_EXTENSION: &str = ".apkg";

/// File names longer than this are shortened in the file row.
pub const DEFAULT_LABEL_MAX_CHARS: usize = 20;

/// The single file type the selection surface advertises.
///
/// Filtering on it is advisory: platforms may still hand over other files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedType {
    pub mime: String,
    pub extension: String,
}

impl AcceptedType {
    pub fn new(mime: impl Into<String>, extension: impl Into<String>) -> Result<Self, ConfigError> {
        let accepted = Self {
            mime: mime.into(),
            extension: extension.into(),
        };
        accepted.validate()?;
        Ok(accepted)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.mime.split_once('/') {
            Some((kind, sub)) if !kind.is_empty() && !sub.is_empty() => {}
            _ => {
                return Err(ConfigError::InvalidAcceptedType(format!(
                    "MIME type '{}' must look like 'type/subtype'",
                    self.mime
                )))
            }
        }

        let bare = self.extension.strip_prefix('.').unwrap_or("");
        if bare.is_empty() || bare.contains(['/', '\\', '*', '.']) {
            return Err(ConfigError::InvalidAcceptedType(format!(
                "extension '{}' must look like '.ext'",
                self.extension
            )));
        }
        Ok(())
    }

    /// Extension without its leading dot, as native file dialogs expect it.
    pub fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }

    /// Glob matching file names of this type, e.g. `*.apkg`. The extension
    /// itself is matched literally.
    pub fn glob_pattern(&self) -> String {
        format!("*{}", Pattern::escape(&self.extension))
    }
}

impl Default for AcceptedType {
    fn default() -> Self {
        Self {
            mime: DEFAULT_MIME.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub accepted: AcceptedType,
    pub label_max_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            accepted: AcceptedType::default(),
            label_max_chars: DEFAULT_LABEL_MAX_CHARS,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the effective configuration: defaults, then the optional
    /// config file, then individual flags.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(endpoint) = &args.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(mime) = &args.accept_mime {
            config.accepted.mime = mime.clone();
        }
        if let Some(extension) = &args.accept_ext {
            config.accepted.extension = extension.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.endpoint_url()?;
        self.accepted.validate()?;
        if self.label_max_chars == 0 {
            return Err(ConfigError::InvalidLabelLength);
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|_| ConfigError::InvalidEndpoint(self.endpoint.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            _ => Err(ConfigError::InvalidEndpoint(self.endpoint.clone())),
        }
    }
}

/// Command-line flags.
#[derive(Debug, Parser)]
#[command(name = "deck_uploader", about = "Upload an Anki deck package over HTTP")]
pub struct Args {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Upload endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Accepted MIME type
    #[arg(long)]
    pub accept_mime: Option<String>,

    /// Accepted file extension, including the dot
    #[arg(long)]
    pub accept_ext: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_the_anki_form() {
        let config = Config::default();
        assert_eq!(config.endpoint, "https://httpbin.org/post");
        assert_eq!(config.accepted.mime, "application/vnd.anki.package");
        assert_eq!(config.accepted.extension, ".apkg");
        assert_eq!(config.label_max_chars, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config(r#"{ "endpoint": "http://localhost:8080/decks" }"#);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8080/decks");
        assert_eq!(config.accepted, AcceptedType::default());
        assert_eq!(config.label_max_chars, DEFAULT_LABEL_MAX_CHARS);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn flags_override_file() {
        let file = write_config(r#"{ "endpoint": "http://localhost:1/a", "label_max_chars": 12 }"#);
        let args = Args::try_parse_from([
            "deck_uploader",
            "--config",
            file.path().to_str().unwrap(),
            "--endpoint",
            "https://example.com/upload",
            "--accept-ext",
            ".colpkg",
        ])
        .unwrap();

        let config = Config::from_args(&args).unwrap();
        assert_eq!(config.endpoint, "https://example.com/upload");
        assert_eq!(config.accepted.extension, ".colpkg");
        assert_eq!(config.accepted.mime, DEFAULT_MIME);
        assert_eq!(config.label_max_chars, 12);
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = Config {
            endpoint: "ftp://example.com/upload".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEndpoint(_))
        ));

        let config = Config {
            endpoint: "not a url".to_string(),
            ..Config::default()
        };
        assert!(config.endpoint_url().is_err());
    }

    #[test]
    fn rejects_malformed_accepted_type() {
        assert!(AcceptedType::new("application", ".apkg").is_err());
        assert!(AcceptedType::new("application/x", "apkg").is_err());
        assert!(AcceptedType::new("application/x", ".").is_err());
        assert!(AcceptedType::new("application/x", ".tar.gz").is_err());
        assert!(AcceptedType::new("application/x", ".ext").is_ok());
    }

    #[test]
    fn accepted_type_helpers() {
        let accepted = AcceptedType::default();
        assert_eq!(accepted.bare_extension(), "apkg");
        assert_eq!(accepted.glob_pattern(), "*.apkg");

        let bracketed = AcceptedType::new("application/x", ".ap[kg").unwrap();
        assert_eq!(bracketed.glob_pattern(), "*.ap[[]kg");
    }
}
