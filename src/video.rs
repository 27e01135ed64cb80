use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use crate::ffmpeg;

/// One image in the slideshow and how long it stays on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFrame {
    pub path: PathBuf,
    pub seconds: u32,
}

/// Input list for ffmpeg's concat demuxer.
///
/// The last image is listed a second time without a duration so the final
/// segment gets an end timestamp.
pub fn build_manifest(frames: &[SlideFrame]) -> anyhow::Result<String> {
    let last = frames
        .last()
        .context("cannot build a slideshow manifest without slides")?;

    let mut out = String::new();
    for frame in frames {
        writeln!(out, "file '{}'", quote_path(&frame.path))?;
        writeln!(out, "duration {}", frame.seconds)?;
    }
    writeln!(out, "file '{}'", quote_path(&last.path))?;
    Ok(out)
}

// Inside single quotes the demuxer only needs `'` itself escaped.
fn quote_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

pub trait VideoEncoder {
    /// Encodes the images listed in `manifest` into a silent video.
    fn encode_slideshow(&self, manifest: &Path, output: &Path) -> anyhow::Result<()>;

    /// Combines the video stream of `video` with the audio of `audio`,
    /// stopping at the end of the shorter one.
    fn mux_audio(&self, video: &Path, audio: &Path, output: &Path) -> anyhow::Result<()>;
}

pub struct Ffmpeg;

impl VideoEncoder for Ffmpeg {
    fn encode_slideshow(&self, manifest: &Path, output: &Path) -> anyhow::Result<()> {
        ffmpeg::run(slideshow_args(manifest, output), "encode slideshow")
    }

    fn mux_audio(&self, video: &Path, audio: &Path, output: &Path) -> anyhow::Result<()> {
        ffmpeg::run(mux_args(video, audio, output), "produce final video")
    }
}

fn slideshow_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-f", "concat", "-safe", "0", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(manifest.into());
    args.extend(
        ["-c:v", "libx264", "-pix_fmt", "yuv420p"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.into());
    args
}

fn mux_args(video: &Path, audio: &Path, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        video.into(),
        "-i".into(),
        audio.into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-shortest".into(),
        output.into(),
    ]
}

/// Turns rendered slides plus narration into the final video.
pub struct Assembler {
    encoder: Box<dyn VideoEncoder>,
    work_dir: PathBuf,
}

impl Assembler {
    pub fn new(encoder: Box<dyn VideoEncoder>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            encoder,
            work_dir: work_dir.into(),
        }
    }

    pub fn assemble(&self, frames: &[SlideFrame], audio: &Path, output: &Path) -> anyhow::Result<()> {
        let manifest = build_manifest(frames)?;
        let list_file = self.work_dir.join("list.txt");
        fs::write(&list_file, manifest)
            .with_context(|| format!("failed to write {}", list_file.display()))?;
        info!("Created concat list file {}", list_file.display());

        let silent = self.work_dir.join("temp.mp4");
        info!("Encoding {} slides into {}", frames.len(), silent.display());
        self.encoder.encode_slideshow(&list_file, &silent)?;

        info!("Merging narration into final video {}", output.display());
        self.encoder.mux_audio(&silent, audio, output)?;
        Ok(())
    }
}
