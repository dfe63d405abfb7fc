//! Font discovery via fontconfig
//!
//! Resolves the family names used by [`FontStyle`](super::FontStyle) to font files

use anyhow::{Context, Result};
use fontconfig::{Fontconfig, Pattern};
use std::ffi::CString;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Style suffixes recognised in "Family Style" names, longest first
const KNOWN_STYLES: &[&str] = &["Bold Italic", "Bold", "Italic", "Regular"];

/// Split "DejaVu Sans Bold" into ("DejaVu Sans", Some("Bold"))
pub fn split_style(font_name: &str) -> (&str, Option<&'static str>) {
    for &style in KNOWN_STYLES {
        if let Some(prefix) = font_name.strip_suffix(style) {
            if prefix.is_empty() || prefix.ends_with(' ') {
                return (prefix.trim(), Some(style));
            }
        }
    }
    (font_name, None)
}

/// Find the font file for a family name, optionally followed by a style
pub fn find_font_path(font_name: &str) -> Result<PathBuf> {
    let (family_name, style_name) = split_style(font_name);
    if family_name.trim().is_empty() {
        anyhow::bail!("Font name '{}' has no family", font_name);
    }
    let fc = Fontconfig::new().context("Failed to initialize fontconfig")?;

    let mut pattern = Pattern::new(&fc);
    let family_cstr = CString::new(family_name)
        .with_context(|| format!("Invalid family name: {}", family_name))?;
    pattern.add_string(fontconfig::FC_FAMILY, &family_cstr);

    if let Some(style) = style_name {
        let style_cstr = CString::new(style)
            .with_context(|| format!("Invalid style name: {}", style))?;
        pattern.add_string(fontconfig::FC_STYLE, &style_cstr);
    }

    let matched = pattern.font_match();

    // Generic aliases ("Sans", "Monospace") legitimately resolve to another family
    let generic = ["sans", "sans-serif", "serif", "monospace"]
        .iter()
        .any(|g| g.eq_ignore_ascii_case(family_name));
    if let Some(matched_family) = matched.get_string(fontconfig::FC_FAMILY) {
        if !generic && !matched_family.eq_ignore_ascii_case(family_name) {
            return Err(anyhow::anyhow!(
                "Font '{}' not found - fontconfig returned family '{}' instead",
                font_name,
                matched_family
            ));
        }
    }

    let file_path = matched
        .filename()
        .with_context(|| format!("No font file found for '{}'", font_name))?;
    let path = PathBuf::from(file_path);

    if !path.exists() {
        warn!(font = font_name, path = %path.display(), "Font file path from fontconfig does not exist");
        return Err(anyhow::anyhow!("Font file path '{}' does not exist", path.display()));
    }

    debug!(font = font_name, family = family_name, style = ?style_name, path = %path.display(), "Resolved font path");
    Ok(path)
}
