use std::path::Path;
use std::path::PathBuf;

use crate::archive::InstallManifest;
use crate::error::SkipReason;
use crate::introspect::RuntimeIntrospector;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TargetState {
  Unresolved,
  Resolved,
  Applied { directive_added: bool },
  Skipped(SkipReason),
}

/// One PHP runtime the loader is installed into during a run.
#[derive(Clone, Debug)]
pub struct VersionTarget {
  version: String,
  config_file: Option<PathBuf>,
  extension_dir: Option<PathBuf>,
  artifact: Option<PathBuf>,
  state: TargetState,
}

/// Paths of a target that resolved completely.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedPaths<'a> {
  pub config_file: &'a Path,
  pub extension_dir: &'a Path,
  pub artifact: &'a Path,
}

impl VersionTarget {
  pub fn new(version: impl Into<String>) -> Self {
    Self {
      version: version.into(),
      config_file: None,
      extension_dir: None,
      artifact: None,
      state: TargetState::Unresolved,
    }
  }

  /// Looks up the runtime's configuration file and extension directory without changing state.
  pub fn locate<I>(&mut self, introspector: &I)
  where
    I: RuntimeIntrospector + ?Sized,
  {
    self.config_file = introspector.config_file_path(&self.version);
    self.extension_dir = introspector.extension_dir(&self.version);
  }

  /// Resolves all three paths. Moves to `Resolved` when everything was found, `Skipped` with the
  /// first missing path otherwise.
  pub fn resolve<I>(&mut self, introspector: &I, manifest: &InstallManifest)
  where
    I: RuntimeIntrospector + ?Sized,
  {
    self.locate(introspector);
    self.artifact = manifest.artifact(&self.version);

    self.state = if self.config_file.is_none() {
      TargetState::Skipped(SkipReason::ConfigFile)
    } else if self.extension_dir.is_none() {
      TargetState::Skipped(SkipReason::ExtensionDir)
    } else if self.artifact.is_none() {
      TargetState::Skipped(SkipReason::Artifact)
    } else {
      TargetState::Resolved
    };
  }

  /// All three paths, once the target is `Resolved`.
  pub fn resolved(&self) -> Option<ResolvedPaths<'_>> {
    if self.state != TargetState::Resolved {
      return None;
    }
    Some(ResolvedPaths {
      config_file: self.config_file.as_deref()?,
      extension_dir: self.extension_dir.as_deref()?,
      artifact: self.artifact.as_deref()?,
    })
  }

  pub fn mark_applied(&mut self, directive_added: bool) {
    self.state = TargetState::Applied { directive_added };
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn config_file(&self) -> Option<&Path> {
    self.config_file.as_deref()
  }

  pub fn extension_dir(&self) -> Option<&Path> {
    self.extension_dir.as_deref()
  }

  pub fn artifact(&self) -> Option<&Path> {
    self.artifact.as_deref()
  }

  pub fn state(&self) -> &TargetState {
    &self.state
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use crate::archive::InstallManifest;
  use crate::error::SkipReason;
  use crate::introspect::RuntimeIntrospector;
  use crate::target::TargetState;
  use crate::target::VersionTarget;

  struct Fixed(Option<PathBuf>, Option<PathBuf>);

  impl RuntimeIntrospector for Fixed {
    fn config_file_path(&self, _version: &str) -> Option<PathBuf> {
      self.0.clone()
    }

    fn extension_dir(&self, _version: &str) -> Option<PathBuf> {
      self.1.clone()
    }
  }

  #[test]
  fn test_new_is_unresolved() {
    let target = VersionTarget::new("8.2");
    assert_eq!(target.state(), &TargetState::Unresolved);
    assert!(target.resolved().is_none());
  }

  fn manifest(dir: &std::path::Path) -> InstallManifest {
    std::fs::write(dir.join("loader_lin_8.2.so"), "").unwrap();
    InstallManifest::load(dir.to_path_buf(), "lin", "so").unwrap()
  }

  fn both() -> Fixed {
    Fixed(Some(PathBuf::from("/php.ini")), Some(PathBuf::from("/ext")))
  }

  #[test]
  fn test_resolved() {
    let dir = tempfile::tempdir().unwrap();
    let mut target = VersionTarget::new("8.2");
    target.resolve(&both(), &manifest(dir.path()));

    assert_eq!(target.state(), &TargetState::Resolved);
    let paths = target.resolved().unwrap();
    assert_eq!(paths.artifact, dir.path().join("loader_lin_8.2.so"));
    assert_eq!(paths.extension_dir, PathBuf::from("/ext"));
  }

  #[test]
  fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut target = VersionTarget::new("8.2");
    target.resolve(&Fixed(None, Some(PathBuf::from("/ext"))), &manifest(dir.path()));
    assert_eq!(target.state(), &TargetState::Skipped(SkipReason::ConfigFile));
    assert!(target.resolved().is_none());
  }

  #[test]
  fn test_missing_extension_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut target = VersionTarget::new("8.2");
    target.resolve(&Fixed(Some(PathBuf::from("/php.ini")), None), &manifest(dir.path()));
    assert_eq!(target.state(), &TargetState::Skipped(SkipReason::ExtensionDir));
    assert_eq!(target.config_file(), Some(PathBuf::from("/php.ini").as_path()));
  }

  #[test]
  fn test_missing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut target = VersionTarget::new("7.4");
    target.resolve(&both(), &manifest(dir.path()));
    assert_eq!(target.state(), &TargetState::Skipped(SkipReason::Artifact));
  }

  #[test]
  fn test_locate_keeps_state() {
    let mut target = VersionTarget::new("8.2");
    target.locate(&both());
    assert_eq!(target.state(), &TargetState::Unresolved);
    assert_eq!(target.extension_dir(), Some(PathBuf::from("/ext").as_path()));
  }
}
