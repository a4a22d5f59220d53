use std::process::Command;

use serde::Deserialize;
use tracing::debug;

use crate::error::InstallError;

/// Controls the services that host the PHP runtimes.
pub trait ServiceManager {
  fn is_active(&self, service: &str) -> bool;

  fn restart(&self, service: &str) -> Result<(), InstallError>;
}

impl<S: ServiceManager + ?Sized> ServiceManager for &S {
  fn is_active(&self, service: &str) -> bool {
    (**self).is_active(service)
  }

  fn restart(&self, service: &str) -> Result<(), InstallError> {
    (**self).restart(service)
  }
}

/// Service managers zenload can drive.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ManagerKind {
  #[default]
  Systemctl,
  /// SysV `service` wrapper.
  Service,
}

impl ManagerKind {
  pub fn program(self) -> &'static str {
    match self {
      ManagerKind::Systemctl => "systemctl",
      ManagerKind::Service => "service",
    }
  }

  fn command(self, verb: &str, service: &str) -> Command {
    let mut command = Command::new(self.program());
    match self {
      ManagerKind::Systemctl => command.arg(verb).arg(service),
      ManagerKind::Service => command.arg(service).arg(verb),
    };
    command
  }
}

impl ServiceManager for ManagerKind {
  fn is_active(&self, service: &str) -> bool {
    let mut command = match self {
      ManagerKind::Systemctl => {
        let mut command = self.command("is-active", service);
        command.arg("--quiet");
        command
      }
      ManagerKind::Service => self.command("status", service),
    };
    match command.output() {
      Ok(output) => output.status.success(),
      Err(err) => {
        debug!("Failed to query {service}: {err}");
        false
      }
    }
  }

  fn restart(&self, service: &str) -> Result<(), InstallError> {
    let output = self
      .command("restart", service)
      .output()
      .map_err(|err| InstallError::Restart { service: service.to_string(), message: err.to_string() })?;
    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InstallError::Restart {
        service: service.to_string(),
        message: format!("{} ({})", stderr.trim(), output.status),
      });
    }
    Ok(())
  }
}

/// The first of `candidates` reported active.
pub fn first_active<'a, S>(manager: &S, candidates: &'a [String]) -> Result<&'a str, InstallError>
where
  S: ServiceManager + ?Sized,
{
  candidates
    .iter()
    .find(|service| manager.is_active(service))
    .map(String::as_str)
    .ok_or_else(|| InstallError::NoActiveService(candidates.to_vec()))
}
