//! Shell-out to ImageMagick's `convert` to produce square JPEG thumbnails.
//! The tool is an opaque external collaborator; only the invocation and the
//! derived output path live here.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::SyncError;

/// Resized copies land in the temp directory as `{name}_{size}x{size}.jpg`.
pub fn resized_path(original: &Path, size: u32) -> PathBuf {
    let name = original
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    env::temp_dir().join(format!("{}_{}x{}.jpg", name, size, size))
}

pub fn resize(original: &Path, size: u32) -> Result<PathBuf, SyncError> {
    let out = resized_path(original, size);
    let status = Command::new("convert")
        .arg(original)
        .arg("-resize")
        .arg(format!("{}x{}", size, size))
        .arg(&out)
        .status()?;
    if !status.success() {
        return Err(SyncError::Resize(status));
    }
    Ok(out)
}
