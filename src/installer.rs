use std::path::Path;

use tempfile::TempDir;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::archive;
use crate::archive::Fetcher;
use crate::archive::InstallManifest;
use crate::config::InstallConfig;
use crate::error::InstallError;
use crate::ini;
use crate::introspect::RuntimeIntrospector;
use crate::preflight;
use crate::service::ServiceManager;
use crate::service::first_active;
use crate::target::TargetState;
use crate::target::VersionTarget;

const ARCHIVE_FILE: &str = "loaders.tar.gz";

/// What a completed run did.
#[derive(Debug)]
pub struct RunOutcome {
  pub targets: Vec<VersionTarget>,
  /// Services restarted, in order, each at most once.
  pub restarted: Vec<String>,
}

/// Installs the loader into every configured PHP version, then restarts the services that
/// load it.
pub struct Installer<F, I, S> {
  config: InstallConfig,
  fetcher: F,
  introspector: I,
  services: S,
}

impl<F, I, S> Installer<F, I, S>
where
  F: Fetcher,
  I: RuntimeIntrospector,
  S: ServiceManager,
{
  pub fn new(config: InstallConfig, fetcher: F, introspector: I, services: S) -> Self {
    Self { config, fetcher, introspector, services }
  }

  pub async fn run(&self) -> Result<RunOutcome, InstallError> {
    self.preflight()?;

    let workdir = self.workdir()?;
    let manifest = self.prepare(workdir.path()).await?;

    let mut targets = Vec::with_capacity(self.config.versions.len());
    for version in &self.config.versions {
      let mut target = VersionTarget::new(version.as_str());
      target.resolve(&self.introspector, &manifest);
      self.apply(&mut target)?;
      targets.push(target);
    }

    let workdir_path = workdir.path().to_path_buf();
    if let Err(err) = workdir.close() {
      warn!("Failed to remove {}: {err}", workdir_path.display());
    }

    let restarted = self.restart(&targets)?;

    Ok(RunOutcome { targets, restarted })
  }

  /// Restarts the first active service of each applied version. A service shared by several
  /// versions is restarted once.
  fn restart(&self, targets: &[VersionTarget]) -> Result<Vec<String>, InstallError> {
    let profile = self.config.profile();
    let mut restarted: Vec<String> = Vec::new();
    for target in targets.iter().filter(|target| matches!(target.state(), TargetState::Applied { .. })) {
      let candidates = profile.services(target.version());
      let service = first_active(&self.services, &candidates)?;
      if restarted.iter().any(|done| done == service) {
        debug!("PHP {}: {service} already restarted", target.version());
        continue;
      }
      self.services.restart(service)?;
      info!("PHP {}: restarted {service}", target.version());
      restarted.push(service.to_string());
    }
    if restarted.is_empty() {
      info!("No PHP version was applied, nothing to restart");
    }
    Ok(restarted)
  }

  fn preflight(&self) -> Result<(), InstallError> {
    if self.config.require_root {
      preflight::check_privilege()?;
    }
    preflight::check_tools(&self.config.required_tools())
  }

  fn workdir(&self) -> Result<TempDir, InstallError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("zenload-");
    match &self.config.temp_dir {
      Some(dir) => builder.tempdir_in(dir),
      None => builder.tempdir(),
    }
    .map_err(InstallError::TempDir)
  }

  /// Downloads and unpacks the archive into `workdir`.
  async fn prepare(&self, workdir: &Path) -> Result<InstallManifest, InstallError> {
    let url = self.config.source_url.as_deref().ok_or(InstallError::NoSourceUrl)?;
    info!("Downloading {url}");

    let bytes = tokio::select! {
      result = self.fetcher.fetch(url) => result?,
      _ = tokio::signal::ctrl_c() => return Err(InstallError::Interrupted),
    };

    let archive_path = workdir.join(ARCHIVE_FILE);
    std::fs::write(&archive_path, bytes)
      .map_err(|err| InstallError::Download { url: url.to_string(), message: err.to_string() })?;

    let extracted = workdir.join("extracted");
    std::fs::create_dir(&extracted).map_err(|err| InstallError::Extract { message: err.to_string() })?;
    archive::extract(&archive_path, &extracted)?;

    InstallManifest::load(extracted.join(&self.config.archive_root), &self.config.platform, &self.config.extension)
  }

  /// Copies the artifact and patches `php.ini` for a resolved target; logs and leaves skipped
  /// targets alone.
  fn apply(&self, target: &mut VersionTarget) -> Result<(), InstallError> {
    if let TargetState::Skipped(reason) = target.state() {
      warn!("PHP {}: {reason}, skipping", target.version());
      return Ok(());
    }
    let Some(paths) = target.resolved() else {
      return Ok(());
    };

    let file_name = paths.artifact.file_name().unwrap_or(paths.artifact.as_os_str());
    let installed = paths.extension_dir.join(file_name);
    std::fs::copy(paths.artifact, &installed).map_err(|source| InstallError::Copy {
      from: paths.artifact.to_path_buf(),
      to: installed.clone(),
      source,
    })?;
    debug!("PHP {}: copied {}", target.version(), installed.display());

    let directive_added = ini::ensure_directive(paths.config_file, &installed)
      .map_err(|source| InstallError::ConfigWrite { path: paths.config_file.to_path_buf(), source })?;
    if directive_added {
      info!("PHP {}: enabled loader in {}", target.version(), paths.config_file.display());
    } else {
      info!("PHP {}: loader already enabled in {}", target.version(), paths.config_file.display());
    }

    target.mark_applied(directive_added);
    Ok(())
  }
}
