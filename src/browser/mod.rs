//! Browser preview helper
//!
//! Developer convenience for eyeballing an HTML response: the content is
//! written to a temporary `.html` file and handed to the desktop opener.

use std::io::Write;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Duration;

use log::{debug, warn};

use crate::error::Result;

/// Time the viewer gets to read the file before it is deleted.
pub const DEFAULT_VIEWER_DELAY: Duration = Duration::from_secs(5);

#[cfg(target_os = "macos")]
const DEFAULT_OPENER: &str = "open";
#[cfg(not(target_os = "macos"))]
const DEFAULT_OPENER: &str = "xdg-open";

/// Command used to open a file, plus how long to keep the file around
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlViewer {
    pub program: String,
    pub args: Vec<String>,
    pub delay: Duration,
}

impl Default for HtmlViewer {
    fn default() -> Self {
        Self {
            program: DEFAULT_OPENER.to_string(),
            args: Vec::new(),
            delay: DEFAULT_VIEWER_DELAY,
        }
    }
}

impl HtmlViewer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Write `content` to a temporary HTML file, run the viewer on it, wait,
    /// then remove the file.
    pub fn open(&self, content: &[u8]) -> Result<ExitStatus> {
        let mut file = tempfile::Builder::new()
            .prefix("rjar-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(content)?;
        file.flush()?;

        let status = self.launch(file.path())?;
        if !status.success() {
            warn!("{} exited with {}", self.program, status);
        }

        std::thread::sleep(self.delay);
        Ok(status)
    }

    fn launch(&self, path: &Path) -> Result<ExitStatus> {
        debug!("Opening {} with {}", path.display(), self.program);
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        Ok(status)
    }
}

/// Show HTML content in the default viewer.
pub fn open_html_in_browser(content: &[u8]) -> Result<ExitStatus> {
    HtmlViewer::default().open(content)
}
