use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::text::decode_text;

/// Name of the converter looked up on PATH
pub const PDFTOTEXT: &str = "pdftotext";

/// Well-known install locations, checked before PATH
pub const PDFTOTEXT_LOCATIONS: &[&str] = &[
    r"C:\Program Files\xpdf-tools\bin64\pdftotext.exe",
    r"C:\Program Files\Git\mingw64\bin\pdftotext.exe",
    r"C:\Program Files\poppler\Library\bin\pdftotext.exe",
    "/usr/bin/pdftotext",
    "/usr/local/bin/pdftotext",
    "/opt/homebrew/bin/pdftotext",
];

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// External `pdftotext` converter
///
/// Each conversion writes into its own temporary directory, which is removed
/// when the call returns. The child process is killed and reaped if it is
/// still running when the call returns, including on timeout.
#[derive(Debug, Clone)]
pub struct PdfConverter {
    executable: PathBuf,
    timeout: Duration,
}

impl PdfConverter {
    pub fn new(executable: PathBuf, timeout: Duration) -> Self {
        Self { executable, timeout }
    }

    /// Find a converter at a well-known path, then on PATH
    pub fn locate(timeout: Duration) -> Option<Self> {
        PDFTOTEXT_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .or_else(|| which::which(PDFTOTEXT).ok())
            .map(|executable| Self::new(executable, timeout))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Convert a PDF to text; `None` on any failure
    pub fn extract(&self, path: &Path) -> Option<String> {
        let temp_dir = tempfile::Builder::new()
            .prefix("docsift-pdf-")
            .tempdir()
            .map_err(|e| log::debug!("Cannot create temp dir for {:?}: {}", path, e))
            .ok()?;
        let output = temp_dir.path().join("output.txt");

        let child = Command::new(&self.executable)
            .args(["-layout", "-nopgbrk", "-q"])
            .arg(path)
            .arg(&output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| log::debug!("Failed to start {:?}: {}", self.executable, e))
            .ok()?;

        let mut guard = ChildGuard::new(child);
        let status = match guard.wait_timeout(self.timeout) {
            Some(status) => status,
            None => {
                log::warn!(
                    "PDF conversion of {:?} exceeded {}s and was stopped",
                    path,
                    self.timeout.as_secs()
                );
                return None;
            }
        };
        if !status.success() {
            log::debug!("PDF conversion of {:?} failed: {}", path, status);
            return None;
        }

        let bytes = fs::read(&output).ok()?;
        Some(decode_text(&bytes))
    }
}

/// Kills and reaps the child unless it already exited
struct ChildGuard {
    child: Child,
    exited: bool,
}

impl ChildGuard {
    fn new(child: Child) -> Self {
        Self { child, exited: false }
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    self.exited = true;
                    return Some(status);
                }
                Ok(None) if Instant::now() >= deadline => return None,
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    log::debug!("Waiting on PDF converter failed: {}", e);
                    return None;
                }
            }
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if !self.exited {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
