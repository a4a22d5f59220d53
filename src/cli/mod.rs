mod install;
mod list;

use std::path::PathBuf;

use clap_verbosity_flag::InfoLevel;
use clap_verbosity_flag::Verbosity;
use zenload::config::InstallConfig;
use zenload::config::parse_version;
use zenload::service::ManagerKind;
use zenload::stack::StackKind;

use crate::cli::install::Install;
use crate::cli::list::List;

pub trait Executable {
  async fn execute(self) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, clap::Parser)]
#[command(version, about, author)]
pub struct Cli {
  #[arg(short, long, env = "ZENLOAD_CONFIG", value_name = "FILE", help = "TOML file with installer settings")]
  config: Option<PathBuf>,
  #[arg(
    short = 'p',
    long = "php",
    value_name = "VERSION",
    value_parser = parse_version,
    num_args = 1..,
    help = "PHP versions to install into, in order"
  )]
  versions: Vec<String>,
  #[arg(short = 'u', long, env = "ZENLOAD_SOURCE_URL", help = "URL of the loader archive (.tar.gz)")]
  source_url: Option<String>,
  #[arg(short, long, env = "ZENLOAD_STACK", value_enum)]
  stack: Option<StackKind>,
  #[arg(long, env = "ZENLOAD_SERVICE_MANAGER", value_enum)]
  service_manager: Option<ManagerKind>,
  #[arg(long, env = "ZENLOAD_PLATFORM", help = "Platform tag in loader file names, e.g. lin")]
  platform: Option<String>,
  #[arg(long, env = "ZENLOAD_TEMP_DIR", value_name = "DIR")]
  temp_dir: Option<PathBuf>,
  #[arg(short, long, help = "Show where each PHP version keeps its configuration and extensions")]
  list: bool,
  #[command(flatten)]
  verbosity: Verbosity<InfoLevel>,
}

impl Cli {
  pub(crate) fn verbosity(&self) -> Verbosity<InfoLevel> {
    self.verbosity
  }

  /// The config file, if any, with command line overrides applied.
  fn install_config(&self) -> anyhow::Result<InstallConfig> {
    let mut config = match &self.config {
      Some(path) => InstallConfig::from_file(path)?,
      None => InstallConfig::default(),
    };

    if !self.versions.is_empty() {
      config.versions = self.versions.clone();
    }
    if let Some(source_url) = &self.source_url {
      config.source_url = Some(source_url.clone());
    }
    if let Some(stack) = self.stack {
      config.stack = stack;
      config.profile = None;
    }
    if let Some(service_manager) = self.service_manager {
      config.service_manager = service_manager;
    }
    if let Some(platform) = &self.platform {
      config.platform = platform.clone();
    }
    if let Some(temp_dir) = &self.temp_dir {
      config.temp_dir = Some(temp_dir.clone());
    }
    config.validate()?;

    Ok(config)
  }
}

impl Executable for Cli {
  async fn execute(self) -> anyhow::Result<()> {
    let config = self.install_config()?;

    if self.list { List::new(config).execute().await } else { Install::new(config).execute().await }
  }
}
