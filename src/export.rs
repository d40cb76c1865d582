// Writes the Output height map to disk so other tools can consume it.

use crate::error::Result;
use crate::types::Buffer;
use std::path::Path;

/// Save `height` as an 8-bit grayscale image; the format follows the extension.
pub fn save_height_map(height: &Buffer, path: &Path) -> Result<()> {
    height.as_image().save(path)?;
    log::info!("height map written to {}", path.display());
    Ok(())
}
