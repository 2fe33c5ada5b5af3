/// Extension of the only image format read and written.
pub const IMAGE_EXTENSION: &str = "png";

/// Ratios applied to a `@2x` source, ordered 3x, 2x, 1x.
pub const FROM_DOUBLE_RATIOS: [f64; 3] = [1.5, 1.0, 0.5];
/// Ratios applied to a `@3x` source, ordered 3x, 2x, 1x.
pub const FROM_TRIPLE_RATIOS: [f64; 3] = [1.0, 0.66, 0.33];

pub const MANIFEST_FILE_NAME: &str = "Contents.json";
pub const MANIFEST_IDIOM: &str = "universal";
pub const MANIFEST_AUTHOR: &str = "asset-resizer";
pub const MANIFEST_VERSION: u32 = 1;

pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const OXIPNG_PRESET: u8 = 4;

pub const EXIT_FAILURE: u8 = 1;

pub const PROGRESS_BAR_TEMPLATE: &str = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
