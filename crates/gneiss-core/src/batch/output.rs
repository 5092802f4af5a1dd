//! Deterministic output-path derivation.
//!
//! An output path is `stem + suffix + "." + extension`, where the
//! extension is the explicit format override (lowercased) or the source's
//! original extension. Outputs are rooted at the configured output
//! directory, or next to their source when none is configured.
//!
//! There is no collision-avoidance renaming at this layer: two sources
//! resolving to the same output will overwrite each other. Accepted.

use crate::batch::types::BatchOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Derive the output path for one source.
pub fn resolve(source: &Path, options: &BatchOptions) -> PathBuf {
    let stem = source
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());

    let extension = options
        .output_format
        .as_ref()
        .map(|format| format.to_lowercase())
        .or_else(|| source.extension().map(|ext| ext.to_string_lossy().into_owned()));

    let file_name = match extension {
        Some(ext) => format!("{}{}.{}", stem, options.output_suffix, ext),
        // Extension-less source with no format override: no trailing dot.
        None => format!("{}{}", stem, options.output_suffix),
    };

    let root = options
        .output_dir
        .clone()
        .or_else(|| source.parent().map(Path::to_path_buf))
        .unwrap_or_default();

    root.join(file_name)
}

/// Create the configured output directory if absent. Idempotent and safe
/// to race with other creators.
pub fn ensure_output_dir(options: &BatchOptions) -> io::Result<()> {
    if let Some(dir) = &options.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
