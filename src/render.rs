use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use anyhow::Context;
use image::RgbImage;
use imageproc::drawing::draw_text_mut;
use tracing::debug;

use crate::config::SlideCanvas;

pub trait SlideRenderer {
    /// Draws slide number `index` (1-based) into `output_dir` and returns its path.
    fn render(&self, text: &str, index: usize, output_dir: &Path) -> anyhow::Result<PathBuf>;
}

pub fn slide_path(output_dir: &Path, index: usize) -> PathBuf {
    output_dir.join(format!("slide_{:03}.png", index))
}

/// Rasterizes slides onto a fixed canvas with a single TrueType font.
pub struct RasterRenderer {
    canvas: SlideCanvas,
    font: FontVec,
}

impl RasterRenderer {
    pub fn new(canvas: SlideCanvas, font_path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(font_path)
            .with_context(|| format!("failed to read font {}", font_path.display()))?;
        let font = FontVec::try_from_vec(bytes)
            .with_context(|| format!("invalid font file {}", font_path.display()))?;
        Ok(Self { canvas, font })
    }
}

impl SlideRenderer for RasterRenderer {
    fn render(&self, text: &str, index: usize, output_dir: &Path) -> anyhow::Result<PathBuf> {
        let c = &self.canvas;
        let mut img = RgbImage::from_pixel(c.width, c.height, c.background);

        draw_text_mut(&mut img, c.text_color, c.margin, c.margin, c.title_size, &self.font, c.title);
        for (y, line) in layout_body(text, c) {
            draw_text_mut(&mut img, c.text_color, c.margin, y, c.body_size, &self.font, &line);
        }

        let path = slide_path(output_dir, index);
        img.save(&path)
            .with_context(|| format!("failed to write slide {}", path.display()))?;
        debug!("Rendered slide {} to {}", index, path.display());
        Ok(path)
    }
}

/// Wrapped body lines paired with the y offset each is drawn at.
pub fn layout_body(text: &str, canvas: &SlideCanvas) -> Vec<(i32, String)> {
    let first = canvas.margin + canvas.title_size as i32 + canvas.title_gap;
    let step = canvas.body_size as i32 + canvas.line_gap;
    wrap_text(text, canvas.wrap_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| (first + i as i32 * step, line))
        .collect()
}

/// Greedy word wrap by character count.
///
/// Hyphenated compounds may break after an inner hyphen. Pieces wider than
/// `width` are cut into `width`-sized runs.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in s.split_whitespace() {
        for (i, piece) in hyphen_pieces(word).into_iter().enumerate() {
            let mut piece: Vec<char> = piece.chars().collect();
            // Only the first piece of a word is preceded by a space.
            let sep = usize::from(i == 0 && current_len > 0);

            if current_len > 0 && current_len + sep + piece.len() > width {
                // Fill the remainder of the line with the head of an overlong piece.
                if piece.len() > width && current_len + sep < width {
                    let room = width - current_len - sep;
                    if sep == 1 {
                        current.push(' ');
                    }
                    current.extend(piece.drain(..room));
                }
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            while piece.len() > width {
                lines.push(piece.drain(..width).collect());
            }
            if piece.is_empty() {
                continue;
            }
            if i == 0 && current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += piece.len();
            current.extend(piece);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits `word` after each hyphen that joins two letter runs, keeping the
/// hyphen on the left piece. Short prefixes like `e-mail` stay whole.
fn hyphen_pieces(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let letter = |i: usize| chars.get(i).is_some_and(|&(_, c)| c.is_alphabetic() || c == '_');
    let hyphen = |i: usize| chars.get(i).is_some_and(|&(_, c)| c == '-');

    let mut pieces = Vec::new();
    let mut start = 0;
    for i in 0..chars.len() {
        if !hyphen(i) || i < 2 {
            continue;
        }
        let before = letter(i - 1) && (letter(i - 2) || (i >= 3 && hyphen(i - 2) && letter(i - 3)));
        let after = letter(i + 1) && (letter(i + 2) || (hyphen(i + 2) && letter(i + 3)));
        if before && after {
            let end = chars[i].0 + 1;
            pieces.push(&word[start..end]);
            start = end;
        }
    }
    pieces.push(&word[start..]);
    pieces
}
