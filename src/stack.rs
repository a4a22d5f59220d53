use std::path::PathBuf;

use serde::Deserialize;

/// Host stacks with a built-in [`StackProfile`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StackKind {
  /// cPanel EasyApache 4 (`/opt/cpanel/ea-phpXY`).
  Cpanel,
  /// Debian/Ubuntu `phpX.Y` packages (`/etc/php/X.Y`).
  #[default]
  Debian,
}

impl StackKind {
  pub fn profile(self) -> StackProfile {
    match self {
      StackKind::Cpanel => StackProfile {
        config_files: vec!["/opt/cpanel/ea-php{short}/root/etc/php.ini".to_string()],
        extension_dirs: vec![
          "/opt/cpanel/ea-php{short}/root/usr/lib64/php/modules".to_string(),
          "/opt/cpanel/ea-php{short}/root/usr/lib/php/modules".to_string(),
        ],
        binaries: vec!["/opt/cpanel/ea-php{short}/root/usr/bin/php".to_string()],
        services: vec!["ea-php{short}-php-fpm".to_string(), "httpd".to_string(), "lsws".to_string()],
      },
      StackKind::Debian => StackProfile {
        config_files: vec![
          "/etc/php/{version}/fpm/php.ini".to_string(),
          "/etc/php/{version}/apache2/php.ini".to_string(),
          "/etc/php/{version}/cli/php.ini".to_string(),
        ],
        extension_dirs: vec![],
        binaries: vec!["/usr/bin/php{version}".to_string(), "php{version}".to_string()],
        services: vec!["php{version}-fpm".to_string(), "apache2".to_string(), "nginx".to_string()],
      },
    }
  }
}

/// Where a host stack keeps its PHP runtimes.
///
/// Paths are templates: `{version}` expands to the identifier as given (`8.2`) and `{short}` to
/// the identifier without dots (`82`). Candidates are tried in order, the first being the primary
/// path and the rest fallbacks. A binary given as a bare name is looked up in `PATH`.
///
/// Service names are templates too. After a version is patched, the first of its services that
/// is active gets restarted, so a per-version FPM pool comes before the web server that may
/// embed PHP itself.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct StackProfile {
  pub config_files: Vec<String>,
  pub extension_dirs: Vec<String>,
  pub binaries: Vec<String>,
  pub services: Vec<String>,
}

impl StackProfile {
  pub fn config_files(&self, version: &str) -> Vec<PathBuf> {
    expand_all(&self.config_files, version)
  }

  pub fn extension_dirs(&self, version: &str) -> Vec<PathBuf> {
    expand_all(&self.extension_dirs, version)
  }

  pub fn binaries(&self, version: &str) -> Vec<PathBuf> {
    expand_all(&self.binaries, version)
  }

  pub fn services(&self, version: &str) -> Vec<String> {
    self.services.iter().map(|template| expand(template, version)).collect()
  }
}

fn expand_all(templates: &[String], version: &str) -> Vec<PathBuf> {
  templates.iter().map(|template| PathBuf::from(expand(template, version))).collect()
}

pub(crate) fn expand(template: &str, version: &str) -> String {
  template.replace("{version}", version).replace("{short}", &version.replace('.', ""))
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use rstest::rstest;

  use crate::stack::StackKind;
  use crate::stack::expand;

  #[rstest]
  #[case("/etc/php/{version}/fpm/php.ini", "8.2", "/etc/php/8.2/fpm/php.ini")]
  #[case("/opt/cpanel/ea-php{short}/root/etc/php.ini", "7.4", "/opt/cpanel/ea-php74/root/etc/php.ini")]
  #[case("/usr/bin/php", "8.3", "/usr/bin/php")]
  fn test_expand(#[case] template: &str, #[case] version: &str, #[case] expected: &str) {
    assert_eq!(expand(template, version), expected);
  }

  #[test]
  fn test_cpanel_profile() {
    let profile = StackKind::Cpanel.profile();
    assert_eq!(profile.config_files("8.1"), vec![PathBuf::from("/opt/cpanel/ea-php81/root/etc/php.ini")]);
    assert_eq!(profile.services("8.1"), vec!["ea-php81-php-fpm", "httpd", "lsws"]);
  }

  #[test]
  fn test_debian_profile_has_fallbacks() {
    let profile = StackKind::Debian.profile();
    let config_files = profile.config_files("8.3");
    assert_eq!(config_files.len(), 3);
    assert_eq!(config_files[0], PathBuf::from("/etc/php/8.3/fpm/php.ini"));
    assert!(profile.extension_dirs("8.3").is_empty());
    assert_eq!(profile.services("8.3"), vec!["php8.3-fpm", "apache2", "nginx"]);
  }
}
