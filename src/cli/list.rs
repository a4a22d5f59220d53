use std::io::Write;
use std::path::Path;

use nu_ansi_term::Color;
use zenload::config::InstallConfig;
use zenload::introspect::StackIntrospector;
use zenload::target::VersionTarget;

use crate::cli::Executable;

pub struct List {
  config: InstallConfig,
}

impl List {
  pub fn new(config: InstallConfig) -> Self {
    Self { config }
  }

  fn print_targets(&self) -> anyhow::Result<()> {
    let introspector = StackIntrospector::new(self.config.profile());

    let stdout = std::io::stdout();
    let mut handle = std::io::BufWriter::new(stdout.lock());

    for (index, version) in self.config.versions.iter().enumerate() {
      let mut target = VersionTarget::new(version.as_str());
      target.locate(&introspector);

      if index > 0 {
        writeln!(handle)?;
      }
      writeln!(handle, "{}", Color::Cyan.bold().paint(format!("[PHP {version}]")))?;
      writeln!(handle, "config file:   {}", display(target.config_file()))?;
      writeln!(handle, "extension dir: {}", display(target.extension_dir()))?;
      writeln!(handle, "loader:        {}", self.config.artifact_name(version))?;
    }
    handle.flush()?;

    Ok(())
  }
}

fn display(path: Option<&Path>) -> String {
  path.map_or_else(|| Color::Yellow.paint("unresolved").to_string(), |path| path.display().to_string())
}

impl Executable for List {
  async fn execute(self) -> anyhow::Result<()> {
    self.print_targets()
  }
}
