use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Context;
use anyhow::bail;

const LOADED_CONFIGURATION_FILE: &str = "Loaded Configuration File";
const EXTENSION_DIR: &str = "extension_dir";

/// Output of `php -i`.
#[derive(Clone, Debug)]
pub struct PhpInfo(String);

impl PhpInfo {
  /// Runs `php -i` with the given binary.
  ///
  /// # Errors
  /// - the binary could not be spawned
  /// - `php -i` exited unsuccessfully
  pub fn get(php: &Path) -> anyhow::Result<Self> {
    let cmd = Command::new(php)
      .arg("-i")
      .output()
      .with_context(|| format!("Failed to run `{} -i`", php.display()))?;
    if !cmd.status.success() {
      bail!("`{} -i` exited with {}", php.display(), cmd.status);
    }
    Ok(Self(String::from_utf8_lossy(&cmd.stdout).into_owned()))
  }

  /// Path of the `php.ini` the runtime loads, if any.
  pub fn loaded_configuration_file(&self) -> Option<PathBuf> {
    self.get_path(LOADED_CONFIGURATION_FILE)
  }

  /// Directory the runtime loads shared extensions from.
  pub fn extension_dir(&self) -> Option<PathBuf> {
    self.get_path(EXTENSION_DIR)
  }

  fn get_path(&self, label: &str) -> Option<PathBuf> {
    self.get_last_token(label).filter(|value| *value != "(none)").map(PathBuf::from)
  }

  // `extension_dir => /usr/lib/php/20230831 => /usr/lib/php/20230831` carries both the local and
  // master value; the last token is the effective one.
  fn get_last_token(&self, label: &str) -> Option<&str> {
    self.0.lines().find(|line| line.contains(label)).and_then(|line| line.split_whitespace().last())
  }
}

impl From<String> for PhpInfo {
  fn from(output: String) -> Self {
    Self(output)
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use crate::PhpInfo;

  const OUTPUT: &str = "phpinfo()
PHP Version => 8.2.26

System => Linux web01 6.1.0-27-amd64 #1 SMP x86_64
Configuration File (php.ini) Path => /etc/php/8.2/cli
Loaded Configuration File => /etc/php/8.2/cli/php.ini
Scan this dir for additional .ini files => /etc/php/8.2/cli/conf.d

Core

PHP Version => 8.2.26

Directive => Local Value => Master Value
extension_dir => /usr/lib/php/20220829 => /usr/lib/php/20220829
";

  #[test]
  fn test_loaded_configuration_file() {
    let info = PhpInfo::from(OUTPUT.to_string());
    assert_eq!(info.loaded_configuration_file(), Some(PathBuf::from("/etc/php/8.2/cli/php.ini")));
  }

  #[test]
  fn test_extension_dir_takes_last_token() {
    let info = PhpInfo::from(OUTPUT.to_string());
    assert_eq!(info.extension_dir(), Some(PathBuf::from("/usr/lib/php/20220829")));
  }

  #[test]
  fn test_none_is_missing() {
    let info = PhpInfo::from("Loaded Configuration File => (none)\n".to_string());
    assert_eq!(info.loaded_configuration_file(), None);
    assert_eq!(info.extension_dir(), None);
  }

  #[test]
  fn test_get_missing_binary() {
    assert!(PhpInfo::get(&PathBuf::from("/nonexistent/zenload/php")).is_err());
  }
}
