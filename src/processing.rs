use crate::catalog::AssetVariant;
use crate::codec::{ImageCodec, SourceImage};
use crate::emitter::emit_plan;
use crate::error::{ResizerError, Result};
use crate::info;
use crate::naming::parse_file_name;
use crate::planner::{plan, UnmarkedPolicy};
use image::GenericImageView;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Descend into subdirectories in directory mode.
    pub recursive: bool,
    /// Write one `Contents.json` per directory in directory mode.
    pub emit_manifest: bool,
    pub unmarked: UnmarkedPolicy,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            emit_manifest: true,
            unmarked: UnmarkedPolicy::AssumeTriple,
        }
    }
}

impl ResizeOptions {
    pub fn new(recursive: bool, emit_manifest: bool, unmarked: UnmarkedPolicy) -> Self {
        Self {
            recursive,
            emit_manifest,
            unmarked,
        }
    }
}

/// Opens and decodes `path`. The file is closed before this returns.
pub fn load_source<C: ImageCodec + ?Sized>(codec: &C, path: &Path) -> Result<SourceImage> {
    let mut file = File::open(path).map_err(|source| ResizerError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    codec
        .decode(&mut file)
        .map_err(|source| ResizerError::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Single-file pipeline: load -> plan -> write the 3x, 2x and 1x variants
/// next to `path`.
///
/// # Returns
/// * `Ok(variants)` - Manifest entries for the three written files
/// * `Err(ResizerError)` - The first failing stage; nothing after it runs
pub fn resize_file_at_path<C: ImageCodec + ?Sized>(
    codec: &C,
    path: &Path,
    options: &ResizeOptions,
) -> Result<Vec<AssetVariant>> {
    info!("\n- Resizing file: {}", path.display());

    let parsed = parse_file_name(&path.to_string_lossy());
    let density = options
        .unmarked
        .resolve(parsed.density)
        .ok_or_else(|| ResizerError::MissingDensityMarker(path.to_path_buf()))?;

    let source = load_source(codec, path)?;
    let (width, height) = source.dimensions();
    let plan = plan(density, width, height).map_err(|source| ResizerError::Size {
        path: path.to_path_buf(),
        source,
    })?;

    info!("- Resizing from {} ({}x{})...", density, width, height);
    emit_plan(codec, &source, &plan, path, &parsed.base)
}
