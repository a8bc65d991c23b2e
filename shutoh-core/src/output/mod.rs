//! Consumers of a finished scene list: CSV tables, still images and clips.

pub mod csv_writer;
pub mod image_extractor;
pub mod template;
pub mod video_splitter;

pub use csv_writer::{SceneRecord, scene_records, write_scenes, write_scenes_to_file};
pub use image_extractor::{ImageExtractor, ImageExtractorOptions, ImageFormat};
pub use template::{expand, video_name};
pub use video_splitter::{SplitOptions, VideoSplitter, build_split_args};
