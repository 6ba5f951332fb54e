pub mod video;

pub use video::{AspectRatio, CreateVideoRequest, Video};
