pub mod php_info;

use std::path::Path;
use std::path::PathBuf;

pub use crate::php_info::PhpInfo;

/// Finds the first usable PHP executable among `candidates`.
///
/// A bare name such as `php8.2` is looked up in `PATH`, anything else must exist as given.
pub fn find_executable(candidates: &[PathBuf]) -> anyhow::Result<PathBuf> {
  for candidate in candidates {
    if is_bare_name(candidate) {
      if let Ok(path) = which::which(candidate) {
        return Ok(path);
      }
    } else if candidate.try_exists()? {
      return Ok(candidate.clone());
    }
  }
  anyhow::bail!("Could not find a PHP executable, looked for {candidates:?}")
}

fn is_bare_name(path: &Path) -> bool {
  path.components().count() == 1 && path.is_relative()
}
