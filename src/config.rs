use std::time::Duration;

use image::Rgb;

pub const DEFAULT_URL: &str = "https://www.zama.org/blog";
pub const DEFAULT_OUT: &str = "zama_explainer_male.mp4";

/// Fixed look and timing of a generated slideshow.
///
/// Built once in `main` and handed to each stage by reference.
#[derive(Debug, Clone)]
pub struct SlideshowConfig {
    pub canvas: SlideCanvas,
    /// Slides stop accepting blocks once this many words are reached.
    pub words_per_slide: usize,
    /// Seconds each slide stays on screen.
    pub slide_seconds: u32,
    /// Only the first N slides are narrated.
    pub narrated_slides: usize,
    pub voice: VoiceTone,
    /// Piper voice model for the neutral narration.
    pub piper_model: &'static str,
    pub fetch_timeout: Duration,
    pub user_agent: &'static str,
    /// Blocks at or below this many characters are dropped during extraction.
    pub min_block_chars: usize,
}

#[derive(Debug, Clone)]
pub struct SlideCanvas {
    pub width: u32,
    pub height: u32,
    pub margin: i32,
    pub background: Rgb<u8>,
    pub text_color: Rgb<u8>,
    /// TrueType font used for both the title and the body.
    pub font_path: &'static str,
    pub title: &'static str,
    pub title_size: f32,
    /// Space between the title line and the first body line.
    pub title_gap: i32,
    pub body_size: f32,
    pub line_gap: i32,
    pub wrap_width: usize,
}

/// Pitch/tempo trick applied to the neutral voice.
#[derive(Debug, Clone, Copy)]
pub struct VoiceTone {
    pub rate_factor: f64,
    pub tempo: f64,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            canvas: SlideCanvas::default(),
            words_per_slide: 40,
            slide_seconds: 6,
            narrated_slides: 8,
            voice: VoiceTone::default(),
            piper_model: "./tts/en_US-hfc_male-medium.onnx",
            fetch_timeout: Duration::from_secs(20),
            user_agent: "slidecast-rust/0.1",
            min_block_chars: 40,
        }
    }
}

impl Default for SlideCanvas {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            margin: 120,
            background: Rgb([15, 20, 30]),
            text_color: Rgb([255, 255, 255]),
            font_path: "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            title: "Zama — Explained",
            title_size: 70.0,
            title_gap: 40,
            body_size: 46.0,
            line_gap: 10,
            wrap_width: 38,
        }
    }
}

impl Default for VoiceTone {
    fn default() -> Self {
        Self {
            rate_factor: 0.85,
            tempo: 1.1,
        }
    }
}
