use std::ffi::OsStr;
use std::process::{Command, Stdio};

use anyhow::Context;
use tracing::{debug, error};

/// Runs ffmpeg to completion, failing on spawn errors or a non-zero exit.
pub fn run<I, S>(args: I, what: &str) -> anyhow::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new("ffmpeg");
    cmd.args(args).stdout(Stdio::null()).stderr(Stdio::inherit());
    debug!("Running {:?}", cmd);

    let status = cmd
        .status()
        .with_context(|| format!("failed to spawn ffmpeg for {}", what))?;
    if !status.success() {
        error!("ffmpeg failed to {} ({})", what, status);
        anyhow::bail!("ffmpeg failed to {}: {}", what, status);
    }
    Ok(())
}
