pub mod batch;
pub mod catalog;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod logger;
pub mod naming;
pub mod planner;
pub mod processing;

pub use batch::{collect_image_files, is_image_file, scan_dir, select_sources, BatchReport};
pub use catalog::{AssetCatalog, AssetVariant};
pub use codec::{CodecError, ImageCodec, OptimizeLevel, PngCodec, SourceImage};
pub use emitter::{emit_plan, emit_variant, write_manifest};
pub use error::{ResizerError, Result};
pub use naming::{clean_name, detect_density, parse_file_name, Density};
pub use planner::{plan, ScalePlan, SourceDensity, UnmarkedPolicy};
pub use processing::{resize_file_at_path, ResizeOptions};
