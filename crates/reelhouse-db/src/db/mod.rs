mod video;

pub use video::VideoRepository;
