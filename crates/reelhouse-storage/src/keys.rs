//! Shared key generation for storage backends.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reelhouse_core::AspectRatio;

const RANDOM_NAME_BYTES: usize = 32;

/// 32 random bytes as unpadded base64url (43 characters).
pub fn random_asset_name() -> String {
    let bytes: [u8; RANDOM_NAME_BYTES] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// `{name}.{extension}` for a thumbnail stored at the assets root.
pub fn thumbnail_key(extension: &str) -> String {
    format!("{}.{}", random_asset_name(), extension)
}

/// `{prefix}/{name}.mp4` for a processed video.
pub fn video_key(aspect_ratio: AspectRatio) -> String {
    format!("{}/{}.mp4", aspect_ratio.prefix(), random_asset_name())
}
