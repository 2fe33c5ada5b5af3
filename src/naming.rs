//! Filename conventions for density-tagged assets.
//!
//! A source is named `{base}@{N}x.png`. The marker sits immediately before the
//! extension; only `@2x` and `@3x` carry meaning as a source density, but any
//! `@Nx` marker is stripped when computing the base name so that variants of
//! the same asset always share one base.
//!
//! Path splitting here works on plain strings so it never fails, not even for
//! an empty path.

use crate::constants::IMAGE_EXTENSION;
use std::fmt;
use std::path::is_separator;

/// Density marker found in a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Density {
    X2,
    X3,
    Unmarked,
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Density::X2 => "@2x",
            Density::X3 => "@3x",
            Density::Unmarked => "unmarked",
        };
        write!(f, "{}", label)
    }
}

/// Result of parsing a source file name like `photo@2x.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Name with extension and density markers removed (`photo`).
    pub base: String,
    pub density: Density,
}

/// Parse the file-name component of `path` into base name and density.
///
/// - `"photo@2x.png"` → base `photo`, density `X2`
/// - `"icons/logo@3X.PNG"` → base `logo`, density `X3`
/// - `"banner.png"` → base `banner`, density `Unmarked`
pub fn parse_file_name(path: &str) -> ParsedName {
    ParsedName {
        base: clean_name(path),
        density: detect_density(path),
    }
}

/// Base name of `path`: the file-name component with every trailing `.png`
/// extension and `@Nx` marker removed.
///
/// Stripping repeats until nothing more applies, so the result is a fixpoint:
/// `clean_name(&clean_name(x)) == clean_name(x)` for every input.
pub fn clean_name(path: &str) -> String {
    let mut name = file_name_of(path);
    while let Some(rest) =
        strip_extension(name).or_else(|| split_marker(name).map(|(base, _)| base))
    {
        name = rest;
    }
    name.to_string()
}

/// Density from the marker right before the extension of the file name.
pub fn detect_density(path: &str) -> Density {
    let name = file_name_of(path);
    let stem = strip_extension(name).unwrap_or(name);
    match split_marker(stem) {
        Some((_, 2)) => Density::X2,
        Some((_, 3)) => Density::X3,
        _ => Density::Unmarked,
    }
}

/// Component after the last separator. Without a separator, or when the path
/// ends in one, the whole path is returned.
pub fn file_name_of(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(idx) if idx + 1 < path.len() => &path[idx + 1..],
        _ => path,
    }
}

/// Everything before the last separator. Without a separator the whole path
/// is returned.
pub fn directory_of(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

fn strip_extension(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || !name[dot + 1..].eq_ignore_ascii_case(IMAGE_EXTENSION) {
        return None;
    }
    Some(&name[..dot])
}

/// Splits `base@Nx` into `(base, N)`. A marker that would leave an empty base
/// is not a marker.
fn split_marker(name: &str) -> Option<(&str, u32)> {
    let at = name.rfind('@')?;
    if at == 0 {
        return None;
    }
    let marker = &name[at + 1..];
    let digits = marker.strip_suffix(['x', 'X'])?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let factor = digits.parse().ok()?;
    Some((&name[..at], factor))
}
