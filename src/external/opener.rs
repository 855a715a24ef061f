use async_trait::async_trait;
use std::io::Write;
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use super::process::{ProcessRunner, SpawnError, TokioProcessRunner};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpenError {
    #[error("Launcher failed: {0}")]
    Launcher(#[from] SpawnError),
    #[error("Launcher '{program}' exited unsuccessfully ({code:?}): {stderr}")]
    LauncherExited {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("Failed to write resource location: {message}")]
    Output { message: String },
}

/// The host's "open a location in a new context" capability.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ResourceOpener: Send + Sync {
    async fn open(&self, url: &Url) -> Result<(), OpenError>;
}

/// Program and leading arguments used to open a URL on this platform.
pub fn platform_launcher() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        // empty title argument so `start` does not treat the URL as one
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

/// Hands the URL to the desktop's default handler.
pub struct SystemOpener<R: ProcessRunner = TokioProcessRunner> {
    runner: R,
}

impl SystemOpener<TokioProcessRunner> {
    pub fn new() -> Self {
        Self {
            runner: TokioProcessRunner,
        }
    }
}

impl Default for SystemOpener<TokioProcessRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ProcessRunner> SystemOpener<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl<R: ProcessRunner> ResourceOpener for SystemOpener<R> {
    async fn open(&self, url: &Url) -> Result<(), OpenError> {
        let (program, leading) = platform_launcher();
        let mut args: Vec<&str> = leading.to_vec();
        args.push(url.as_str());

        debug!(program, url = %url, "Opening resource");
        let report = self.runner.run(program, &args).await?;
        if !report.success() {
            return Err(OpenError::LauncherExited {
                program: program.to_string(),
                code: report.code,
                stderr: report.stderr,
            });
        }

        info!(url = %url, "Resource opened");
        Ok(())
    }
}

/// Writes the URL instead of launching anything; for headless hosts.
pub struct PrintOpener<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl PrintOpener<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: Mutex::new(std::io::stdout()),
        }
    }
}

impl<W: Write + Send> PrintOpener<W> {
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<W: Write + Send> ResourceOpener for PrintOpener<W> {
    async fn open(&self, url: &Url) -> Result<(), OpenError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{url}").map_err(|e| OpenError::Output { message: e.to_string() })
    }
}
