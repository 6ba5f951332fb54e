//! API constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

/// Path thumbnails are served from; `{public_base_url}{ASSETS_PREFIX}/{file}`
pub const ASSETS_PREFIX: &str = "/assets";

/// Multipart field carrying a thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file
pub const VIDEO_FIELD: &str = "video";

/// Thumbnail media types and the file extension each is stored with
pub const THUMBNAIL_MEDIA_TYPES: [(&str, &str); 2] = [("image/png", "png"), ("image/jpeg", "jpeg")];

/// The only accepted video media type
pub const VIDEO_MEDIA_TYPE: &str = "video/mp4";
