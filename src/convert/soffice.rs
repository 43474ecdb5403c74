//! LibreOffice-backed format conversion.
//!
//! Runs `soffice --headless --convert-to <ext>` out of process and scrapes
//! the produced file path from the engine's stdout (`-> <path> using
//! filter`). Conversion failures are not assumed transient: there is no
//! retry, and an expired timeout is surfaced as a fatal conversion error.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use regex::Regex;

use crate::error::{MailMergeError, Result};
use crate::pipeline::collaborators::FormatConverter;

/// Converts documents to a fixed target format via a headless LibreOffice
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    /// Target format passed to `--convert-to` (e.g. `pdf`)
    target_format: String,
    /// Optional per-conversion timeout
    timeout: Option<Duration>,
}

impl SofficeConverter {
    /// A converter targeting the given format, without a timeout
    #[must_use]
    pub fn new(target_format: impl Into<String>) -> Self {
        Self {
            target_format: target_format.into(),
            timeout: None,
        }
    }

    /// Set a per-conversion timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The LibreOffice executable for the current platform
    #[must_use]
    pub fn executable() -> &'static str {
        if cfg!(target_os = "macos") {
            "/Applications/LibreOffice.app/Contents/MacOS/soffice"
        } else {
            "libreoffice"
        }
    }

    fn conversion_error(source: &Path, message: impl Into<String>) -> MailMergeError {
        MailMergeError::Conversion {
            source_path: source.to_path_buf(),
            message: message.into(),
        }
    }
}

impl FormatConverter for SofficeConverter {
    fn convert(&self, source: &Path) -> Result<PathBuf> {
        let out_dir = source.parent().unwrap_or_else(|| Path::new("."));

        log::debug!(
            "converting {} to {} via {}",
            source.display(),
            self.target_format,
            Self::executable()
        );

        let mut child = Command::new(Self::executable())
            .arg("--headless")
            .arg("--convert-to")
            .arg(&self.target_format)
            .arg("--outdir")
            .arg(out_dir)
            .arg(source)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::conversion_error(source, format!("cannot start engine: {e}")))?;

        if let Some(timeout) = self.timeout {
            let started = Instant::now();
            loop {
                match child.try_wait()? {
                    Some(_) => break,
                    None if started.elapsed() >= timeout => {
                        child.kill()?;
                        child.wait()?;
                        return Err(Self::conversion_error(
                            source,
                            format!("engine timed out after {timeout:?}"),
                        ));
                    }
                    None => std::thread::sleep(Duration::from_millis(50)),
                }
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Self::conversion_error(source, format!("engine wait failed: {e}")))?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        // Example line: "convert x.docx -> /out/x.pdf using filter ..."
        let pattern = Regex::new(r"-> (.*?) using filter")
            .map_err(|e| Self::conversion_error(source, format!("bad output pattern: {e}")))?;

        match pattern.captures(&stdout).and_then(|c| c.get(1)) {
            Some(path) => Ok(PathBuf::from(path.as_str())),
            None => Err(Self::conversion_error(
                source,
                format!("no result path in engine output: {stdout}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_scraping_pattern() {
        let pattern = Regex::new(r"-> (.*?) using filter").unwrap();
        let stdout = "convert /tmp/a.docx -> /tmp/out/a.pdf using filter : writer_pdf_Export";

        let path = pattern.captures(stdout).and_then(|c| c.get(1)).unwrap();
        assert_eq!(path.as_str(), "/tmp/out/a.pdf");
    }

    #[test]
    fn test_unparseable_output_shape() {
        let pattern = Regex::new(r"-> (.*?) using filter").unwrap();
        assert!(pattern.captures("Error: source file could not be loaded").is_none());
    }
}
