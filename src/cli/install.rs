use tracing::info;
use zenload::archive::HttpFetcher;
use zenload::config::InstallConfig;
use zenload::installer::Installer;
use zenload::introspect::StackIntrospector;
use zenload::target::TargetState;

use crate::cli::Executable;

pub struct Install {
  config: InstallConfig,
}

impl Install {
  pub fn new(config: InstallConfig) -> Self {
    Self { config }
  }
}

impl Executable for Install {
  async fn execute(self) -> anyhow::Result<()> {
    let introspector = StackIntrospector::new(self.config.profile());
    let services = self.config.service_manager;
    let installer = Installer::new(self.config, HttpFetcher::default(), introspector, services);

    let outcome = installer.run().await?;
    let applied = outcome.targets.iter().filter(|target| matches!(target.state(), TargetState::Applied { .. })).count();
    info!("Loader installed for {applied} of {} PHP versions", outcome.targets.len());

    Ok(())
  }
}
