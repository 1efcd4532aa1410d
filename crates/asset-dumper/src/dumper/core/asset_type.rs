//! Asset type codes and the file extension each one is saved under

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Extension used for any type code not in the table
pub const FALLBACK_EXTENSION: &str = "bin";

static EXTENSIONS: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (1, "png"),   // Image
        (3, "mp3"),   // Audio
        (5, "lua"),   // Lua
        (7, "txt"),   // Text
        (9, "rbxl"),  // Place
        (10, "rbxm"), // Model
    ])
});

/// Look up the extension for an asset type code
pub fn extension_for(type_id: u32) -> &'static str {
    EXTENSIONS.get(&type_id).copied().unwrap_or(FALLBACK_EXTENSION)
}

/// Build the on-disk filename for an asset, `"{id}.{extension}"`
pub fn filename_for(id: super::AssetId, type_id: u32) -> String {
    format!("{}.{}", id, extension_for(type_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_type_codes() {
        assert_eq!(extension_for(1), "png");
        assert_eq!(extension_for(3), "mp3");
        assert_eq!(extension_for(5), "lua");
        assert_eq!(extension_for(7), "txt");
        assert_eq!(extension_for(9), "rbxl");
        assert_eq!(extension_for(10), "rbxm");
    }

    #[test]
    fn test_unknown_type_code_falls_back() {
        assert_eq!(extension_for(0), FALLBACK_EXTENSION);
        assert_eq!(extension_for(2), FALLBACK_EXTENSION);
        assert_eq!(filename_for(42, 999), "42.bin");
    }

    #[test]
    fn test_filename_uses_id_and_extension() {
        assert_eq!(filename_for(1818, 1), "1818.png");
        assert_eq!(filename_for(5, 10), "5.rbxm");
    }
}
