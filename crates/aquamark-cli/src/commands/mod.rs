//! CLI command implementations

pub mod apply;
pub mod modes;

use anyhow::{bail, Context, Result};
use aquamark_core::{Backend, RgbaImage};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Load a PNG as an RGBA image on `backend`.
///
/// Palette, low bit-depth and 16-bit images are normalized to 8-bit. Images
/// without an alpha channel load with alpha inactive.
pub fn load_image(path: &Path, backend: Backend) -> Result<RgbaImage> {
    let file = File::open(path).with_context(|| format!("Failed to load: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let data = &buf[..info.buffer_size()];
    let (w, h) = (info.width, info.height);

    let image = match info.color_type {
        png::ColorType::Rgba => RgbaImage::from_raw(w, h, data.to_vec(), backend)?,
        png::ColorType::Rgb => RgbaImage::from_rgb(w, h, data, backend)?,
        png::ColorType::GrayscaleAlpha => {
            let rgba = data.chunks_exact(2).flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]]).collect();
            RgbaImage::from_raw(w, h, rgba, backend)?
        }
        png::ColorType::Grayscale => {
            let rgb: Vec<u8> = data.iter().flat_map(|&g| [g, g, g]).collect();
            RgbaImage::from_rgb(w, h, &rgb, backend)?
        }
        other => bail!("{}: unsupported color type {:?}", path.display(), other),
    };
    Ok(image)
}

/// Save an image as 8-bit PNG; RGB when the alpha channel is inactive.
pub fn save_image(path: &Path, image: &RgbaImage) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to save: {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let data = if image.has_alpha() {
        encoder.set_color(png::ColorType::Rgba);
        image.data().to_vec()
    } else {
        encoder.set_color(png::ColorType::Rgb);
        image.data().chunks_exact(4).flat_map(|p| [p[0], p[1], p[2]]).collect()
    };

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(&data)
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}
