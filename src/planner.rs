//! Scale planning: which three sizes to produce from one source.
//!
//! All functions here are pure; nothing touches images or the filesystem.

use crate::constants::{FROM_DOUBLE_RATIOS, FROM_TRIPLE_RATIOS, IMAGE_EXTENSION};
use crate::naming::Density;
use std::fmt;
use thiserror::Error;

/// Output density of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Three,
    Two,
    One,
}

impl Scale {
    /// Emission order: largest first.
    pub const ALL: [Scale; 3] = [Scale::Three, Scale::Two, Scale::One];

    /// Filename suffix placed between base name and extension.
    pub fn suffix(self) -> &'static str {
        match self {
            Scale::Three => "@3x",
            Scale::Two => "@2x",
            Scale::One => "",
        }
    }

    /// Value of the manifest `scale` field.
    pub fn label(self) -> &'static str {
        match self {
            Scale::Three => "3x",
            Scale::Two => "2x",
            Scale::One => "1x",
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.label())
    }
}

/// Density a source is treated as once the unmarked policy has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceDensity {
    Double,
    Triple,
}

impl SourceDensity {
    fn ratios(self) -> [f64; 3] {
        match self {
            SourceDensity::Double => FROM_DOUBLE_RATIOS,
            SourceDensity::Triple => FROM_TRIPLE_RATIOS,
        }
    }
}

impl fmt::Display for SourceDensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceDensity::Double => write!(f, "@2x"),
            SourceDensity::Triple => write!(f, "@3x"),
        }
    }
}

/// What to do with a source whose name carries neither `@2x` nor `@3x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmarkedPolicy {
    /// Treat it as the largest variant, the same as `@3x`.
    #[default]
    AssumeTriple,
    /// Refuse to process it.
    Reject,
}

impl UnmarkedPolicy {
    /// `None` when the policy refuses the density.
    pub fn resolve(self, density: Density) -> Option<SourceDensity> {
        match (density, self) {
            (Density::X2, _) => Some(SourceDensity::Double),
            (Density::X3, _) => Some(SourceDensity::Triple),
            (Density::Unmarked, UnmarkedPolicy::AssumeTriple) => Some(SourceDensity::Triple),
            (Density::Unmarked, UnmarkedPolicy::Reject) => None,
        }
    }
}

/// One planned output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variant {
    pub scale: Scale,
    pub ratio: f64,
    pub width: u32,
    pub height: u32,
}

impl Variant {
    pub fn file_name(&self, base: &str) -> String {
        format!("{}{}.{}", base, self.scale.suffix(), IMAGE_EXTENSION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{scale} variant would be {width}x{height} pixels")]
pub struct DegenerateVariant {
    pub scale: Scale,
    pub width: u32,
    pub height: u32,
}

/// The three outputs for a source, ordered 3x, 2x, 1x.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePlan {
    variants: [Variant; 3],
}

impl ScalePlan {
    pub fn variants(&self) -> &[Variant; 3] {
        &self.variants
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }
}

/// Scales a pixel dimension by `ratio`, truncating toward zero.
pub fn scale_dimension(value: u32, ratio: f64) -> u32 {
    (value as f64 * ratio) as u32
}

/// Computes the plan for a `width`x`height` source of the given density.
///
/// Fails if any variant would have a zero width or height, in which case no
/// variant of the source should be written.
///
/// # Example
/// ```
/// use asset_resizer::planner::{plan, Scale, SourceDensity};
///
/// let plan = plan(SourceDensity::Triple, 300, 300).unwrap();
/// let sizes: Vec<_> = plan.iter().map(|v| (v.scale, v.width)).collect();
/// assert_eq!(sizes, vec![(Scale::Three, 300), (Scale::Two, 198), (Scale::One, 99)]);
/// ```
pub fn plan(
    density: SourceDensity,
    width: u32,
    height: u32,
) -> Result<ScalePlan, DegenerateVariant> {
    let ratios = density.ratios();
    let mut variants = [Variant {
        scale: Scale::Three,
        ratio: 1.0,
        width,
        height,
    }; 3];

    for ((slot, scale), ratio) in variants.iter_mut().zip(Scale::ALL).zip(ratios) {
        let target_width = scale_dimension(width, ratio);
        let target_height = scale_dimension(height, ratio);
        if target_width == 0 || target_height == 0 {
            return Err(DegenerateVariant {
                scale,
                width: target_width,
                height: target_height,
            });
        }
        *slot = Variant {
            scale,
            ratio,
            width: target_width,
            height: target_height,
        };
    }

    Ok(ScalePlan { variants })
}
