//! Apply command

use crate::ApplyArgs;
use anyhow::{bail, Context, Result};
use aquamark_ops::{Anchor, BlendModeRegistry, WatermarkCompositor, WatermarkSettings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What an apply run produced.
#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Inputs skipped on purpose (the watermark itself, unselected sizes).
    pub skipped: usize,
    /// Inputs that could not be read, watermarked or saved.
    pub failed: usize,
}

pub fn run(args: ApplyArgs, verbose: bool) -> Result<ApplySummary> {
    let settings = build_settings(&args)?;
    let watermark = super::load_image(&args.watermark, args.backend)?.with_filter(args.filter);
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;

    if verbose {
        println!(
            "Watermarking {} image(s) with {} ({}, {} backend)",
            args.input.len(),
            args.watermark.display(),
            settings.placement.blend_mode,
            args.backend
        );
    }

    let mut summary = ApplySummary::default();
    let mut variants = Vec::with_capacity(args.input.len());

    for input in &args.input {
        if same_file(input, &args.watermark) {
            info!(path = %input.display(), "skipping the watermark image itself");
            summary.skipped += 1;
            continue;
        }
        let name = variant_name(input);
        if !settings.image_sizes.is_empty() && !settings.wants_size(&name) {
            debug!(variant = %name, "size not selected");
            summary.skipped += 1;
            continue;
        }
        let Some(file_name) = input.file_name() else {
            warn!(path = %input.display(), "input has no file name");
            summary.failed += 1;
            continue;
        };
        match super::load_image(input, args.backend) {
            Ok(image) => variants.push((name, args.output.join(file_name), image)),
            Err(e) => {
                warn!(path = %input.display(), error = %format!("{:#}", e), "skipping unreadable image");
                summary.failed += 1;
            }
        }
    }

    let compositor = WatermarkCompositor::new(settings.placement);
    let outcomes = compositor.compose_variants(
        variants.iter_mut().map(|(name, _, image)| (name.clone(), image)),
        &watermark,
    );

    for (outcome, (_, out_path, image)) in outcomes.iter().zip(&variants) {
        let Ok(report) = &outcome.result else {
            summary.failed += 1;
            continue;
        };
        if let Err(e) = super::save_image(out_path, image) {
            warn!(variant = %outcome.name, error = %format!("{:#}", e), "could not save");
            summary.failed += 1;
            continue;
        }
        if verbose {
            println!(
                "  {} -> {} ({} at {},{}; {:?})",
                outcome.name,
                out_path.display(),
                report.scaled,
                report.position.x,
                report.position.y,
                report.strategy
            );
        }
        summary.written.push(out_path.clone());
    }

    info!(
        written = summary.written.len(),
        skipped = summary.skipped,
        failed = summary.failed,
        "apply finished"
    );

    if summary.written.is_empty() && summary.failed > 0 {
        bail!("No images were watermarked ({} failed)", summary.failed);
    }
    Ok(summary)
}

/// Settings file (or defaults) with command-line overrides applied.
fn build_settings(args: &ApplyArgs) -> Result<WatermarkSettings> {
    let mut settings = match &args.settings {
        Some(path) => WatermarkSettings::from_yaml_file(path)?,
        None => WatermarkSettings::default(),
    };

    let p = &mut settings.placement;
    if let Some(key) = &args.position {
        p.position = Anchor::from_key(key);
        if p.position.key() != key {
            warn!(position = %key, "unknown position, using {}", p.position);
        }
    }
    if let Some(v) = args.offset_x {
        p.offset_x = v;
    }
    if let Some(v) = args.offset_y {
        p.offset_y = v;
    }
    if let Some(unit) = args.offset_unit {
        p.offset_unit = unit;
    }
    if let Some(v) = args.width {
        p.width = v;
    }
    if let Some(v) = args.height {
        p.height = v;
    }
    if let Some(unit) = args.size_unit {
        p.size_unit = unit;
    }
    if let Some(v) = args.opacity {
        p.opacity = v;
    }
    if let Some(mode) = &args.blend_mode {
        p.blend_mode = mode.clone();
    }

    // Fail before any image is loaded.
    BlendModeRegistry.resolve(&p.blend_mode)?;

    Ok(settings.sanitized())
}

/// Variant name of an input: its file stem.
fn variant_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
