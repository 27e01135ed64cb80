use std::ffi::OsString;
use std::fs;
use std::path::Path;

use anyhow::Context;
use hound::WavReader;
use tracing::info;

use crate::config::VoiceTone;
use crate::ffmpeg;
use crate::tts::SpeechEngine;

pub fn wav_sample_rate(path: &Path) -> anyhow::Result<u32> {
    let reader = WavReader::open(path)
        .with_context(|| format!("failed to read WAV header of {}", path.display()))?;
    Ok(reader.spec().sample_rate)
}

pub fn wav_duration_seconds(path: &Path) -> anyhow::Result<f64> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let samples = reader.len();
    let frames = samples as f64 / spec.channels as f64;
    let duration = frames / spec.sample_rate as f64;
    Ok(duration)
}

/// Post-processing applied to the raw synthesized voice.
pub trait AudioFilter {
    fn apply(&self, input: &Path, sample_rate: u32, output: &Path) -> anyhow::Result<()>;
}

/// Lowers pitch by resampling, then restores pace with a tempo change.
pub struct FfmpegPitchShift {
    tone: VoiceTone,
}

impl FfmpegPitchShift {
    pub fn new(tone: VoiceTone) -> Self {
        Self { tone }
    }
}

impl AudioFilter for FfmpegPitchShift {
    fn apply(&self, input: &Path, sample_rate: u32, output: &Path) -> anyhow::Result<()> {
        let graph = pitch_filter_graph(sample_rate, self.tone);
        info!("Applying voice filter {}", graph);
        ffmpeg::run(filter_args(input, graph, output), "filter narration")
    }
}

fn filter_args(input: &Path, graph: String, output: &Path) -> Vec<OsString> {
    vec![
        "-y".into(),
        "-i".into(),
        input.into(),
        "-af".into(),
        graph.into(),
        output.into(),
    ]
}

pub fn pitch_filter_graph(sample_rate: u32, tone: VoiceTone) -> String {
    let shifted = (sample_rate as f64 * tone.rate_factor).round() as u32;
    format!("asetrate={},atempo={}", shifted, tone.tempo)
}

/// Produces the narration track: neutral TTS followed by the pitch filter.
pub struct Synthesizer {
    engine: Box<dyn SpeechEngine>,
    filter: Box<dyn AudioFilter>,
}

impl Synthesizer {
    pub fn new(engine: Box<dyn SpeechEngine>, filter: Box<dyn AudioFilter>) -> Self {
        Self { engine, filter }
    }

    pub fn synthesize(&self, text: &str, output: &Path) -> anyhow::Result<()> {
        let raw = output.with_file_name("raw_voice.wav");
        self.engine.speak(text, &raw)?;

        let rate = wav_sample_rate(&raw)?;
        info!(
            "Raw narration: {:.2} seconds at {} Hz",
            wav_duration_seconds(&raw)?,
            rate
        );
        self.filter.apply(&raw, rate, output)?;

        fs::remove_file(&raw)
            .with_context(|| format!("failed to remove {}", raw.display()))?;
        Ok(())
    }
}
