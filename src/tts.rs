use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context;
use tracing::{error, info};

/// Neutral-voice text-to-speech producing a WAV file.
pub trait SpeechEngine {
    fn speak(&self, text: &str, out_path: &Path) -> anyhow::Result<()>;
}

/// The `piper` CLI, fed text on stdin.
pub struct Piper {
    model: PathBuf,
}

impl Piper {
    pub fn new(model: impl Into<PathBuf>) -> Self {
        Self { model: model.into() }
    }
}

impl SpeechEngine for Piper {
    fn speak(&self, text: &str, out_path: &Path) -> anyhow::Result<()> {
        info!("Calling Piper TTS for output file {}", out_path.display());
        let mut child = Command::new("piper")
            .arg("--model")
            .arg(&self.model)
            .arg("--output_file")
            .arg(out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn piper process")?;

        {
            let stdin = child.stdin.as_mut().context("failed to open piper stdin")?;
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            error!("Piper TTS command failed for {}", out_path.display());
            anyhow::bail!("TTS engine failed, command returned {}", status);
        }
        Ok(())
    }
}
