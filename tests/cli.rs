use std::process::Command;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CargoError;
use assert_cmd::cargo::CommandCargoExt;
use predicates::str::contains;

const ENV_VARS: [&str; 6] = [
  "ZENLOAD_CONFIG",
  "ZENLOAD_SOURCE_URL",
  "ZENLOAD_STACK",
  "ZENLOAD_SERVICE_MANAGER",
  "ZENLOAD_PLATFORM",
  "ZENLOAD_TEMP_DIR",
];

fn zenload() -> Result<Command, CargoError> {
  let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME"))?;
  for name in ENV_VARS {
    cmd.env_remove(name);
  }
  Ok(cmd)
}

#[test]
fn test_cli_help() -> Result<(), CargoError> {
  zenload()?.arg("--help").assert().success().stdout(contains("--source-url")).stdout(contains("--php"));

  Ok(())
}

#[test]
fn test_cli_invalid_version() -> Result<(), CargoError> {
  zenload()?.args(["--php", "8"]).assert().failure().stderr(contains("Invalid PHP version"));

  Ok(())
}

#[test]
fn test_cli_service_manager_env() -> Result<(), CargoError> {
  zenload()?.env("ZENLOAD_SERVICE_MANAGER", "launchd").arg("--list").assert().failure().stderr(contains("launchd"));

  Ok(())
}

#[test]
fn test_cli_list() -> Result<(), CargoError> {
  zenload()?
    .args(["--list", "--stack", "debian", "--platform", "lin", "--php", "9.8", "9.9"])
    .assert()
    .success()
    .stdout(contains("[PHP 9.8]"))
    .stdout(contains("[PHP 9.9]"))
    .stdout(contains("unresolved"))
    .stdout(contains("loader_lin_9.9.so"));

  Ok(())
}

#[test]
fn test_cli_bad_config() -> Result<(), CargoError> {
  zenload()?
    .args(["--list", "--config", "tests/fixtures/missing.toml"])
    .assert()
    .failure()
    .stderr(contains("Failed to read config file"));

  Ok(())
}

#[test]
fn test_cli_download_failure() -> Result<(), Box<dyn std::error::Error>> {
  let dir = tempfile::tempdir()?;
  let work = dir.path().join("work");
  std::fs::create_dir(&work)?;
  let config = dir.path().join("zenload.toml");
  std::fs::write(
    &config,
    format!(
      "versions = [\"8.2\"]\n\
       source_url = \"http://127.0.0.1:9/loaders.tar.gz\"\n\
       require_root = false\n\
       required_tools = []\n\
       temp_dir = \"{}\"\n",
      work.display()
    ),
  )?;

  zenload()?.arg("--config").arg(&config).assert().failure().stderr(contains("Failed to download"));
  assert_eq!(std::fs::read_dir(&work)?.count(), 0);

  Ok(())
}
