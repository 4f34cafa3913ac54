// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Summary figure for an aggregate
//!
//! Plots every byte of the aggregate recording as a blue point and every
//! detected rising edge as a red point, with a title and labelled axes, then
//! writes an RGB PNG. The PNG is encoded with uncompressed deflate blocks.

use recflow_core::{ActionContext, ActionError, ArtifactKind};
use std::path::Path;

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

// Plot area, in pixels
const LEFT: u32 = 48;
const RIGHT: u32 = WIDTH - 16;
const TOP: u32 = 40;
const BOTTOM: u32 = HEIGHT - 40;

pub const TITLE: &str = "Threshold crossings";
pub const X_LABEL: &str = "sample number";
pub const Y_LABEL: &str = "byte value";

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

pub type Rgb = [u8; 3];
pub const WHITE: Rgb = [255, 255, 255];
pub const BLACK: Rgb = [0, 0, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const RED: Rgb = [255, 0, 0];

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
/// Largest payload of a stored deflate block
const STORED_BLOCK_MAX: usize = 0xffff;

/// RGB raster, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![WHITE; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set one pixel; out-of-bounds writes are dropped
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// 3x3 marker centred on (x, y)
    pub fn dot(&mut self, x: u32, y: u32, color: Rgb) {
        for dy in 0..3 {
            for dx in 0..3 {
                if let (Some(px), Some(py)) = ((x + dx).checked_sub(1), (y + dy).checked_sub(1)) {
                    self.set(px, py, color);
                }
            }
        }
    }

    fn hline(&mut self, y: u32, from: u32, to: u32, color: Rgb) {
        for x in from..=to {
            self.set(x, y, color);
        }
    }

    fn vline(&mut self, x: u32, from: u32, to: u32, color: Rgb) {
        for y in from..=to {
            self.set(x, y, color);
        }
    }

    /// Draw `text` left to right with its top-left corner at (x, y)
    pub fn text(&mut self, x: u32, y: u32, text: &str, scale: u32, color: Rgb) {
        self.glyphs(text, scale, color, |gx, gy| (x + gx, y + gy));
    }

    /// Draw `text` bottom to top, rotated a quarter turn, starting at (x, y)
    pub fn text_up(&mut self, x: u32, y: u32, text: &str, scale: u32, color: Rgb) {
        self.glyphs(text, scale, color, |gx, gy| (x + gy, y.wrapping_sub(gx)));
    }

    fn glyphs<F>(&mut self, text: &str, scale: u32, color: Rgb, place: F)
    where
        F: Fn(u32, u32) -> (u32, u32),
    {
        for (i, c) in text.chars().enumerate() {
            let origin = i as u32 * GLYPH_ADVANCE * scale;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if bits & (0x10 >> col) == 0 {
                        continue;
                    }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            let (px, py) =
                                place(origin + col * scale + sx, row as u32 * scale + sy);
                            self.set(px, py, color);
                        }
                    }
                }
            }
        }
    }

    /// Encode as an 8-bit RGB PNG
    pub fn encode_png(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.pixels.len() * 3 + self.height as usize);
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            // filter type: none
            raw.push(0);
            for px in row {
                raw.extend_from_slice(px);
            }
        }

        let mut ihdr = Vec::with_capacity(13);
        ihdr.extend_from_slice(&self.width.to_be_bytes());
        ihdr.extend_from_slice(&self.height.to_be_bytes());
        // bit depth 8, colour type RGB, default compression/filter, no interlace
        ihdr.extend_from_slice(&[8, 2, 0, 0, 0]);

        let mut png = PNG_SIGNATURE.to_vec();
        write_chunk(&mut png, b"IHDR", &ihdr);
        write_chunk(&mut png, b"IDAT", &zlib_stored(&raw));
        write_chunk(&mut png, b"IEND", &[]);
        png
    }
}

/// Scatter `samples` (blue) and the samples at `edges` (red)
pub fn render_summary(samples: &[u8], edges: &[usize]) -> Result<Canvas, ActionError> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT);
    let (left, right, top, bottom) = (LEFT, RIGHT, TOP, BOTTOM);

    canvas.vline(left, top, bottom, BLACK);
    canvas.hline(bottom, left, right, BLACK);
    label_axes(&mut canvas, samples.len());

    let span = samples.len().saturating_sub(1).max(1) as u64;
    let to_point = |index: usize, value: u8| -> (u32, u32) {
        let x = left as u64 + (index as u64) * u64::from(right - left) / span;
        let y = bottom as u64 - u64::from(value) * u64::from(bottom - top) / 255;
        (x as u32, y as u32)
    };

    for (i, &value) in samples.iter().enumerate() {
        let (x, y) = to_point(i, value);
        canvas.dot(x, y, BLUE);
    }
    for &edge in edges {
        let value = samples.get(edge).copied().ok_or_else(|| {
            ActionError::Failed(format!(
                "edge at sample {} is outside the {} samples of the aggregate",
                edge,
                samples.len()
            ))
        })?;
        let (x, y) = to_point(edge, value);
        canvas.dot(x, y, RED);
    }
    Ok(canvas)
}

fn text_width(text: &str, scale: u32) -> u32 {
    (text.chars().count() as u32 * GLYPH_ADVANCE).saturating_sub(1) * scale
}

fn label_axes(canvas: &mut Canvas, samples: usize) {
    canvas.text((WIDTH - text_width(TITLE, 2)) / 2, 12, TITLE, 2, BLACK);

    let x_mid = (LEFT + RIGHT) / 2;
    canvas.text(x_mid - text_width(X_LABEL, 1) / 2, BOTTOM + 20, X_LABEL, 1, BLACK);
    let y_mid = (TOP + BOTTOM) / 2;
    canvas.text_up(8, y_mid + text_width(Y_LABEL, 1) / 2, Y_LABEL, 1, BLACK);

    // Ticks at the ends of both axes
    canvas.text(LEFT - 4 - text_width("0", 1), BOTTOM - GLYPH_HEIGHT / 2, "0", 1, BLACK);
    canvas.text(LEFT - 4 - text_width("255", 1), TOP - GLYPH_HEIGHT / 2, "255", 1, BLACK);
    canvas.text(LEFT - text_width("0", 1) / 2, BOTTOM + 6, "0", 1, BLACK);
    let last = samples.saturating_sub(1).to_string();
    canvas.text(RIGHT - text_width(&last, 1), BOTTOM + 6, &last, 1, BLACK);
}

/// Rows of a 5x7 glyph, most significant of the low five bits leftmost.
/// Characters without a glyph render as blank space.
fn glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        'T' => [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'a' => [0x00, 0x00, 0x0e, 0x01, 0x0f, 0x11, 0x0f],
        'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1e],
        'c' => [0x00, 0x00, 0x0e, 0x10, 0x10, 0x11, 0x0e],
        'd' => [0x01, 0x01, 0x0d, 0x13, 0x11, 0x11, 0x0f],
        'e' => [0x00, 0x00, 0x0e, 0x11, 0x1f, 0x10, 0x0e],
        'g' => [0x00, 0x0f, 0x11, 0x11, 0x0f, 0x01, 0x0e],
        'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
        'i' => [0x04, 0x00, 0x0c, 0x04, 0x04, 0x04, 0x0e],
        'l' => [0x0c, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e],
        'm' => [0x00, 0x00, 0x1a, 0x15, 0x15, 0x11, 0x11],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'o' => [0x00, 0x00, 0x0e, 0x11, 0x11, 0x11, 0x0e],
        'p' => [0x00, 0x00, 0x1e, 0x11, 0x1e, 0x10, 0x10],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        's' => [0x00, 0x00, 0x0e, 0x10, 0x0e, 0x01, 0x1e],
        't' => [0x08, 0x08, 0x1c, 0x08, 0x08, 0x09, 0x06],
        'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0d],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0a, 0x04],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x0f, 0x01, 0x0e],
        _ => [0; 7],
    }
}

/// In-process action: render the summary figure of one aggregate
pub fn plot_summary(ctx: &ActionContext<'_>) -> Result<(), ActionError> {
    let aggregate_path = ctx.locate(&ArtifactKind::Aggregate);
    let edges_path = ctx.locate(&ArtifactKind::Edges);
    let figure_path = ctx.locate(&ArtifactKind::Figure);

    let samples = std::fs::read(&aggregate_path)?;
    let edges = read_edges(&edges_path)?;
    let canvas = render_summary(&samples, &edges).map_err(|e| ActionError::InvalidInput {
        path: edges_path.clone(),
        message: e.to_string(),
    })?;

    std::fs::write(&figure_path, canvas.encode_png())?;
    tracing::debug!(
        figure = %figure_path.display(),
        samples = samples.len(),
        edges = edges.len(),
        "figure written"
    );
    Ok(())
}

/// Edge sample indices: a JSON array of non-negative integers
fn read_edges(path: &Path) -> Result<Vec<usize>, ActionError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| ActionError::InvalidInput {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let mut crc = crc32fast::Hasher::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.finalize().to_be_bytes());
}

/// zlib stream made of stored (uncompressed) deflate blocks
fn zlib_stored(data: &[u8]) -> Vec<u8> {
    let blocks = data.len() / STORED_BLOCK_MAX + 1;
    let mut out = Vec::with_capacity(data.len() + blocks * 5 + 6);
    // CMF/FLG: deflate, 32K window, no dictionary, check bits valid
    out.extend_from_slice(&[0x78, 0x01]);

    let mut chunks = data.chunks(STORED_BLOCK_MAX).peekable();
    if chunks.peek().is_none() {
        out.extend_from_slice(&[1, 0, 0, 0xff, 0xff]);
    }
    while let Some(chunk) = chunks.next() {
        let last = chunks.peek().is_none();
        out.push(u8::from(last));
        let len = chunk.len() as u16;
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(&(!len).to_le_bytes());
        out.extend_from_slice(chunk);
    }

    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

fn adler32(data: &[u8]) -> u32 {
    const MOD: u32 = 65521;
    let (mut a, mut b) = (1u32, 0u32);
    for chunk in data.chunks(5552) {
        for &byte in chunk {
            a += u32::from(byte);
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    (b << 16) | a
}

#[cfg(test)]
#[path = "figure_tests.rs"]
mod tests;
