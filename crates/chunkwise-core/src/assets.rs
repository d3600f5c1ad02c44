//! Static asset routing by file extension.

use serde::{Deserialize, Serialize};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];
const FONT_EXTENSIONS: &[&str] = &["woff", "woff2", "ttf", "eot"];
const STYLESHEET_EXTENSIONS: &[&str] = &["css"];

/// Category of an emitted static asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Image,
    Font,
    Stylesheet,
    Other,
}

impl AssetCategory {
    /// Categorize an asset by the extension of its file name.
    ///
    /// Matching is case-insensitive and looks only at the last path segment.
    /// Names without an extension are [`AssetCategory::Other`].
    pub fn from_file_name(file_name: &str) -> Self {
        match split_file_name(file_name).1 {
            Some(ext) => Self::from_extension(ext),
            None => AssetCategory::Other,
        }
    }

    /// Categorize a bare extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            AssetCategory::Image
        } else if FONT_EXTENSIONS.contains(&ext.as_str()) {
            AssetCategory::Font
        } else if STYLESHEET_EXTENSIONS.contains(&ext.as_str()) {
            AssetCategory::Stylesheet
        } else {
            AssetCategory::Other
        }
    }

    /// Output directory for this category, without a trailing slash.
    pub fn dir(self) -> &'static str {
        match self {
            AssetCategory::Image => "images",
            AssetCategory::Font => "fonts",
            AssetCategory::Stylesheet => "css",
            AssetCategory::Other => "assets",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetCategory::Image => "image",
            AssetCategory::Font => "font",
            AssetCategory::Stylesheet => "stylesheet",
            AssetCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an asset is routed: its category and output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetRoute {
    pub category: AssetCategory,
    pub dir: &'static str,
}

impl AssetRoute {
    pub fn for_file_name(file_name: &str) -> Self {
        let category = AssetCategory::from_file_name(file_name);
        Self {
            category,
            dir: category.dir(),
        }
    }
}

/// Split the last path segment of `name` into stem and extension.
///
/// Both `/` and `\` are separators. A leading dot does not start an
/// extension, so `.env` has stem `.env` and no extension. Neither does a
/// trailing dot.
pub(crate) fn split_file_name(name: &str) -> (&str, Option<&str>) {
    let base = last_segment(name);
    match base.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < base.len() => (&base[..pos], Some(&base[pos + 1..])),
        _ => (base, None),
    }
}

pub(crate) fn last_segment(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}
