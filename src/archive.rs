//! Fetching and unpacking the loader archive.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use regex::Regex;
use tar::Archive;
use tar::EntryType;
use tracing::debug;

use crate::error::InstallError;

/// Source of the loader archive.
pub trait Fetcher {
  async fn fetch(&self, url: &str) -> Result<Vec<u8>, InstallError>;
}

/// Fetches over HTTP(S).
#[derive(Clone, Debug, Default)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl Fetcher for HttpFetcher {
  async fn fetch(&self, url: &str) -> Result<Vec<u8>, InstallError> {
    let download_error =
      |err: reqwest::Error| InstallError::Download { url: url.to_string(), message: err.to_string() };

    let response = self.client.get(url).send().await.map_err(download_error)?;
    let response = response.error_for_status().map_err(download_error)?;
    let bytes = response.bytes().await.map_err(download_error)?;
    debug!("Downloaded {} bytes from {url}", bytes.len());

    Ok(bytes.to_vec())
  }
}

/// Unpacks the gzip-compressed tarball at `archive` into `dest`.
///
/// Entries with absolute paths or `..` components are rejected, as is anything that is not a
/// regular file or directory. Permissions from the archive are not restored.
pub fn extract(archive: &Path, dest: &Path) -> Result<(), InstallError> {
  let file = File::open(archive).map_err(|err| extract_error(format!("failed to open {}: {err}", archive.display())))?;
  let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
  archive.set_preserve_permissions(false);

  let mut entry_count = 0usize;
  for entry in archive.entries().map_err(|err| extract_error(format!("failed to read archive entries: {err}")))? {
    let mut entry = entry.map_err(|err| extract_error(format!("failed to read archive entry: {err}")))?;
    let entry_path =
      entry.path().map_err(|err| extract_error(format!("failed to read entry path: {err}")))?.into_owned();

    let entry_type = entry.header().entry_type();
    if !matches!(
      entry_type,
      EntryType::Regular | EntryType::Directory | EntryType::GNULongName | EntryType::XHeader | EntryType::XGlobalHeader
    ) {
      return Err(extract_error(format!("unsupported entry type {entry_type:?} at {}", entry_path.display())));
    }
    validate_entry_path(&entry_path)?;

    let target = dest.join(&entry_path);
    if let Some(parent) = target.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|err| extract_error(format!("failed to create directory {}: {err}", parent.display())))?;
    }
    entry.unpack(&target).map_err(|err| extract_error(format!("failed to unpack {}: {err}", entry_path.display())))?;
    entry_count += 1;
  }

  if entry_count == 0 {
    return Err(extract_error("archive is empty".to_string()));
  }
  debug!("Extracted {entry_count} entries into {}", dest.display());

  Ok(())
}

fn validate_entry_path(path: &Path) -> Result<(), InstallError> {
  let escapes = path
    .components()
    .any(|component| matches!(component, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
  if escapes {
    return Err(extract_error(format!("path traversal in entry {}", path.display())));
  }
  Ok(())
}

fn extract_error(message: String) -> InstallError {
  InstallError::Extract { message }
}

/// The extracted loader directory and the artifacts it holds, keyed by PHP version.
#[derive(Clone, Debug)]
pub struct InstallManifest {
  root: PathBuf,
  artifacts: BTreeMap<String, String>,
}

impl InstallManifest {
  /// Scans `root` for files named `loader_<platform>_<version>.<extension>`.
  pub fn load(root: PathBuf, platform: &str, extension: &str) -> Result<Self, InstallError> {
    let pattern = format!(r"^loader_{}_(\d+\.\d+)\.{}$", regex::escape(platform), regex::escape(extension));
    let pattern = Regex::new(&pattern).map_err(|err| extract_error(err.to_string()))?;

    let entries = std::fs::read_dir(&root)
      .map_err(|err| extract_error(format!("archive has no loader directory {}: {err}", root.display())))?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
      let entry = entry.map_err(|err| extract_error(err.to_string()))?;
      if !entry.file_type().is_ok_and(|file_type| file_type.is_file()) {
        continue;
      }
      let file_name = entry.file_name().to_string_lossy().into_owned();
      if let Some(captures) = pattern.captures(&file_name) {
        artifacts.insert(captures[1].to_string(), file_name);
      }
    }
    debug!("Archive provides loaders for {:?}", artifacts.keys().collect::<Vec<_>>());

    Ok(Self { root, artifacts })
  }

  /// Absolute path of the artifact for `version`, if the archive has one.
  pub fn artifact(&self, version: &str) -> Option<PathBuf> {
    self.artifacts.get(version).map(|file_name| self.root.join(file_name))
  }
}
