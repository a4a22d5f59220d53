use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;
use zenload_php::PhpInfo;

use crate::stack::StackProfile;

/// Answers where a PHP runtime keeps its configuration and extensions.
pub trait RuntimeIntrospector {
  fn config_file_path(&self, version: &str) -> Option<PathBuf>;

  fn extension_dir(&self, version: &str) -> Option<PathBuf>;
}

/// Looks up runtimes through a host stack's known paths, falling back to asking the runtime
/// itself with `php -i`.
///
/// `php -i` runs at most once per version; its output is kept for later lookups.
#[derive(Debug)]
pub struct StackIntrospector {
  profile: StackProfile,
  probed: Mutex<HashMap<String, Option<PhpInfo>>>,
}

impl StackIntrospector {
  pub fn new(profile: StackProfile) -> Self {
    Self { profile, probed: Mutex::default() }
  }

  fn probe(&self, version: &str) -> Option<PhpInfo> {
    let mut probed = self.probed.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    probed.entry(version.to_string()).or_insert_with(|| self.run_php(version)).clone()
  }

  fn run_php(&self, version: &str) -> Option<PhpInfo> {
    let php = zenload_php::find_executable(&self.profile.binaries(version))
      .inspect_err(|err| debug!("PHP {version}: {err:#}"))
      .ok()?;
    debug!("PHP {version}: probing {}", php.display());
    PhpInfo::get(&php).inspect_err(|err| debug!("PHP {version}: {err:#}")).ok()
  }
}

impl RuntimeIntrospector for StackIntrospector {
  fn config_file_path(&self, version: &str) -> Option<PathBuf> {
    first_existing(self.profile.config_files(version), |path| path.is_file())
      .or_else(|| self.probe(version)?.loaded_configuration_file().filter(|path| path.is_file()))
  }

  fn extension_dir(&self, version: &str) -> Option<PathBuf> {
    first_existing(self.profile.extension_dirs(version), |path| path.is_dir())
      .or_else(|| self.probe(version)?.extension_dir().filter(|path| path.is_dir()))
  }
}

fn first_existing(candidates: Vec<PathBuf>, exists: impl Fn(&PathBuf) -> bool) -> Option<PathBuf> {
  candidates.into_iter().find(|candidate| exists(candidate))
}
