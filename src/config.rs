use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::service::ManagerKind;
use crate::stack::StackKind;
use crate::stack::StackProfile;

pub const DEFAULT_VERSIONS: [&str; 6] = ["7.4", "8.0", "8.1", "8.2", "8.3", "8.4"];

static VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+$").expect("valid version regex"));

/// Everything an installer run needs to know.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct InstallConfig {
  pub versions: Vec<String>,
  pub source_url: Option<String>,
  pub stack: StackKind,
  /// Replaces the built-in profile of `stack` when present.
  pub profile: Option<StackProfile>,
  pub platform: String,
  pub extension: String,
  /// Directory inside the archive holding the loader artifacts.
  pub archive_root: PathBuf,
  pub temp_dir: Option<PathBuf>,
  pub service_manager: ManagerKind,
  /// Defaults to the service manager's client binary.
  pub required_tools: Option<Vec<String>>,
  pub require_root: bool,
}

impl Default for InstallConfig {
  fn default() -> Self {
    Self {
      versions: DEFAULT_VERSIONS.iter().map(ToString::to_string).collect(),
      source_url: None,
      stack: StackKind::default(),
      profile: None,
      platform: default_platform().to_string(),
      extension: "so".to_string(),
      archive_root: PathBuf::from("loaders"),
      temp_dir: None,
      service_manager: ManagerKind::default(),
      required_tools: None,
      require_root: true,
    }
  }
}

impl InstallConfig {
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    let content = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Self =
      toml::from_str(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    config.validate()?;

    Ok(config)
  }

  pub fn validate(&self) -> anyhow::Result<()> {
    if self.versions.is_empty() {
      anyhow::bail!("No PHP versions configured");
    }
    for version in &self.versions {
      parse_version(version)?;
    }
    Ok(())
  }

  pub fn profile(&self) -> StackProfile {
    self.profile.clone().unwrap_or_else(|| self.stack.profile())
  }

  pub fn required_tools(&self) -> Vec<String> {
    self.required_tools.clone().unwrap_or_else(|| vec![self.service_manager.program().to_string()])
  }

  /// File name of the loader artifact for `version`, e.g. `loader_lin_8.2.so`.
  pub fn artifact_name(&self, version: &str) -> String {
    format!("loader_{}_{}.{}", self.platform, version, self.extension)
  }
}

pub fn parse_version(arg: &str) -> anyhow::Result<String> {
  if !VERSION.is_match(arg) {
    anyhow::bail!("Invalid PHP version `{arg}`, expected MAJOR.MINOR such as 8.2");
  }
  Ok(arg.to_string())
}

fn default_platform() -> &'static str {
  match std::env::consts::OS {
    "macos" => "dar",
    "freebsd" => "fre",
    _ => "lin",
  }
}
