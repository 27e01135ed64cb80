mod args;
mod audio;
mod config;
mod extract;
mod ffmpeg;
mod pipeline;
mod render;
mod segment;
mod tts;
mod video;

use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::args::Args;
use crate::audio::{FfmpegPitchShift, Synthesizer};
use crate::config::SlideshowConfig;
use crate::pipeline::{Pipeline, prepare_work_dir};
use crate::render::RasterRenderer;
use crate::tts::Piper;
use crate::video::{Assembler, Ffmpeg};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = SlideshowConfig::default();
    info!("Starting slideshow generation for {}", args.url);

    let blocks = extract::fetch_page_blocks(&args.url, &config).await?;
    if blocks.is_empty() {
        anyhow::bail!("no usable text blocks extracted from {}", args.url);
    }

    let work_dir = prepare_work_dir()?;
    let renderer = RasterRenderer::new(config.canvas.clone(), Path::new(config.canvas.font_path))?;
    let synthesizer = Synthesizer::new(
        Box::new(Piper::new(config.piper_model)),
        Box::new(FfmpegPitchShift::new(config.voice)),
    );
    let assembler = Assembler::new(Box::new(Ffmpeg), &work_dir);
    let pipeline = Pipeline::new(config, work_dir, Box::new(renderer), synthesizer, assembler);

    let summary = pipeline.run(&blocks, Path::new(&args.out))?;
    info!(
        "Rendered {} slides, narration at {}",
        summary.slides.len(),
        summary.narration.display()
    );

    println!("DONE: {}", summary.video.display());
    Ok(())
}
