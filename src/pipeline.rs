use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::audio::Synthesizer;
use crate::config::SlideshowConfig;
use crate::render::SlideRenderer;
use crate::segment::segment;
use crate::video::{Assembler, SlideFrame};

/// Per-run scratch directory under the system temp dir, recreated empty.
pub fn prepare_work_dir() -> anyhow::Result<PathBuf> {
    let dir = std::env::temp_dir().join(format!("slidecast-{}", std::process::id()));
    recreate_dir(&dir)?;
    Ok(dir)
}

fn recreate_dir(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        info!("Removing existing work dir '{}'", dir.display());
        fs::remove_dir_all(dir)
            .with_context(|| format!("failed to clear work dir {}", dir.display()))?;
    }
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create work dir {}", dir.display()))?;
    info!("Created work directory '{}'", dir.display());
    Ok(())
}

#[derive(Debug)]
pub struct RunSummary {
    pub slides: Vec<PathBuf>,
    pub narration: PathBuf,
    pub video: PathBuf,
}

pub struct Pipeline {
    config: SlideshowConfig,
    work_dir: PathBuf,
    renderer: Box<dyn SlideRenderer>,
    synthesizer: Synthesizer,
    assembler: Assembler,
}

impl Pipeline {
    pub fn new(
        config: SlideshowConfig,
        work_dir: PathBuf,
        renderer: Box<dyn SlideRenderer>,
        synthesizer: Synthesizer,
        assembler: Assembler,
    ) -> Self {
        Self {
            config,
            work_dir,
            renderer,
            synthesizer,
            assembler,
        }
    }

    /// Runs every stage after extraction: segment, render, narrate, assemble.
    pub fn run(&self, blocks: &[String], output: &Path) -> anyhow::Result<RunSummary> {
        if blocks.is_empty() {
            anyhow::bail!("no usable text blocks to build slides from");
        }

        let slides = segment(blocks, self.config.words_per_slide);
        info!("Split page into {} slides", slides.len());

        let mut slide_paths = Vec::with_capacity(slides.len());
        for (i, text) in slides.iter().enumerate() {
            info!("Rendering slide {}/{}", i + 1, slides.len());
            debug!("Slide text: {}", text);
            slide_paths.push(self.renderer.render(text, i + 1, &self.work_dir)?);
        }

        let narration_text = narration_script(&slides, self.config.narrated_slides);
        let narration = self.work_dir.join("voice_male.mp3");
        info!(
            "Synthesizing narration for {} of {} slides",
            slides.len().min(self.config.narrated_slides),
            slides.len()
        );
        self.synthesizer.synthesize(&narration_text, &narration)?;

        let frames: Vec<SlideFrame> = slide_paths
            .iter()
            .map(|path| SlideFrame {
                path: path.clone(),
                seconds: self.config.slide_seconds,
            })
            .collect();
        self.assembler.assemble(&frames, &narration, output)?;

        Ok(RunSummary {
            slides: slide_paths,
            narration,
            video: output.to_path_buf(),
        })
    }
}

/// Text read aloud: the first `count` slides joined by spaces.
pub fn narration_script(slides: &[String], count: usize) -> String {
    slides
        .iter()
        .take(count)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
