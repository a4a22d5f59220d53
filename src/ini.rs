use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// The `php.ini` line that loads `artifact` at startup.
pub fn directive(artifact: &Path) -> String {
  format!("zend_extension=\"{}\"", artifact.display())
}

/// Appends the load directive for `artifact` to `config_file` unless that exact line is already
/// present. Returns whether the file was changed.
///
/// The file is compared as bytes, so `php.ini` files that are not valid UTF-8 are accepted.
pub fn ensure_directive(config_file: &Path, artifact: &Path) -> std::io::Result<bool> {
  let line = directive(artifact);
  let content = std::fs::read(config_file)?;
  if lines(&content).any(|existing| existing == line.as_bytes()) {
    return Ok(false);
  }

  let mut file = OpenOptions::new().append(true).open(config_file)?;
  if content.last().is_some_and(|last| *last != b'\n') {
    file.write_all(b"\n")?;
  }
  writeln!(file, "{line}")?;

  Ok(true)
}

fn lines(content: &[u8]) -> impl Iterator<Item = &[u8]> {
  content.split(|byte| *byte == b'\n').map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}
