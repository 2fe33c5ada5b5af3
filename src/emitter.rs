use crate::catalog::{AssetCatalog, AssetVariant};
use crate::codec::{ImageCodec, SourceImage};
use crate::constants::MANIFEST_FILE_NAME;
use crate::error::{ResizerError, Result};
use crate::naming::file_name_of;
use crate::planner::{ScalePlan, Variant};
use crate::{info, verbose};
use image::GenericImageView;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sibling path of `source_path` named after `base` and the variant's scale.
pub fn output_path_for(source_path: &Path, base: &str, variant: &Variant) -> PathBuf {
    source_path.with_file_name(variant.file_name(base))
}

/// Resamples `source` to the variant's size and writes it to `output_path`.
///
/// A variant the same size as the source is re-encoded without resampling.
pub fn emit_variant<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage,
    variant: &Variant,
    output_path: &Path,
) -> Result<AssetVariant> {
    let resize_error = |source| ResizerError::Resize {
        path: output_path.to_path_buf(),
        source,
    };

    let resized = if (variant.width, variant.height) == source.dimensions() {
        info!("\tRe-encoding {} file", variant.scale);
        None
    } else {
        info!("\tCreating {} file", variant.scale);
        Some(
            codec
                .resample(source, variant.width, variant.height)
                .map_err(resize_error)?,
        )
    };
    let image = resized.as_ref().unwrap_or(source);

    let file = File::create(output_path).map_err(|source| ResizerError::FileCreate {
        path: output_path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    codec.encode(image, &mut writer).map_err(resize_error)?;
    writer
        .flush()
        .map_err(|e| resize_error(e.into()))?;

    verbose!(
        "Wrote {} ({}x{})",
        output_path.display(),
        variant.width,
        variant.height
    );

    let file_name = file_name_of(&output_path.to_string_lossy()).to_string();
    Ok(AssetVariant::new(file_name, variant.scale))
}

/// Writes every variant of `plan` next to `source_path`, in plan order.
///
/// Stops at the first failing variant; variants already written stay on disk.
pub fn emit_plan<C: ImageCodec + ?Sized>(
    codec: &C,
    source: &SourceImage,
    plan: &ScalePlan,
    source_path: &Path,
    base: &str,
) -> Result<Vec<AssetVariant>> {
    plan.iter()
        .map(|variant| {
            let output_path = output_path_for(source_path, base, variant);
            emit_variant(codec, source, variant, &output_path)
        })
        .collect()
}

/// Serializes `catalog` to `Contents.json` in `dir`, replacing any existing
/// manifest.
pub fn write_manifest(catalog: &AssetCatalog, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE_NAME);
    let manifest_error = |source| ResizerError::ManifestWrite {
        path: path.clone(),
        source,
    };

    let json = catalog
        .to_json()
        .map_err(|e| manifest_error(e.into()))?;
    fs::write(&path, json).map_err(manifest_error)?;

    verbose!("Wrote manifest {}", path.display());
    Ok(path)
}
