use nix::unistd::Uid;
use tracing::debug;

use crate::error::InstallError;

/// Fails unless the process runs with an effective uid of root.
pub fn check_privilege() -> Result<(), InstallError> {
  if !Uid::effective().is_root() {
    return Err(InstallError::NotPrivileged);
  }
  Ok(())
}

/// Fails on the first tool that cannot be found in `PATH`.
pub fn check_tools<S: AsRef<str>>(tools: &[S]) -> Result<(), InstallError> {
  for tool in tools {
    let tool = tool.as_ref();
    let path = which::which(tool).map_err(|_| InstallError::MissingTool(tool.to_string()))?;
    debug!("Found {tool} at {}", path.display());
  }
  Ok(())
}
