use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort the whole run.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("zenload must be run as root")]
  NotPrivileged,
  #[error("Required tool `{0}` was not found in PATH")]
  MissingTool(String),
  #[error("No source URL configured, set `source_url` or pass --source-url")]
  NoSourceUrl,
  #[error("Failed to create temporary directory: {0}")]
  TempDir(#[source] std::io::Error),
  #[error("Failed to download {url}: {message}")]
  Download { url: String, message: String },
  #[error("Download interrupted")]
  Interrupted,
  #[error("Failed to extract archive: {message}")]
  Extract { message: String },
  #[error("Failed to copy {} to {}: {source}", from.display(), to.display())]
  Copy {
    from: PathBuf,
    to: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to update {}: {source}", path.display())]
  ConfigWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("None of the services {0:?} is active")]
  NoActiveService(Vec<String>),
  #[error("Failed to restart {service}: {message}")]
  Restart { service: String, message: String },
}

/// Why a single version was left untouched.
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum SkipReason {
  #[error("configuration file not found")]
  ConfigFile,
  #[error("extension directory not found")]
  ExtensionDir,
  #[error("loader artifact not found in archive")]
  Artifact,
}
