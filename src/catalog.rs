use crate::constants::{MANIFEST_AUTHOR, MANIFEST_IDIOM, MANIFEST_VERSION};
use crate::planner::Scale;
use serde::{Deserialize, Serialize};

/// One image entry of a `Contents.json` manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetVariant {
    pub idiom: String,
    pub filename: String,
    pub scale: String,
}

impl AssetVariant {
    pub fn new(filename: impl Into<String>, scale: Scale) -> Self {
        Self {
            idiom: MANIFEST_IDIOM.to_string(),
            filename: filename.into(),
            scale: scale.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub version: u32,
    pub author: String,
}

impl Default for CatalogInfo {
    fn default() -> Self {
        Self {
            version: MANIFEST_VERSION,
            author: MANIFEST_AUTHOR.to_string(),
        }
    }
}

/// Manifest describing every variant written into one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCatalog {
    pub images: Vec<AssetVariant>,
    pub info: CatalogInfo,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `variant`, replacing an earlier entry for the same file so a
    /// filename is never listed twice.
    pub fn push(&mut self, variant: AssetVariant) {
        match self
            .images
            .iter_mut()
            .find(|existing| existing.filename == variant.filename)
        {
            Some(existing) => *existing = variant,
            None => self.images.push(variant),
        }
    }

    pub fn extend(&mut self, variants: impl IntoIterator<Item = AssetVariant>) {
        for variant in variants {
            self.push(variant);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
