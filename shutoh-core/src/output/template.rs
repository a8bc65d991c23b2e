//! Output file name templates.
//!
//! Templates may contain `$VIDEO_NAME` (input file stem), `$SCENE_NUMBER`
//! (zero-padded to three digits) and `$IMAGE_NUMBER` (zero-padded to two
//! digits). Scene and image numbers count from zero.

use std::path::Path;

pub const DEFAULT_CSV_TEMPLATE: &str = "$VIDEO_NAME-scenes.csv";
pub const DEFAULT_SPLIT_TEMPLATE: &str = "$VIDEO_NAME-scene-$SCENE_NUMBER.mp4";
pub const DEFAULT_IMAGE_TEMPLATE: &str = "$VIDEO_NAME-scene-$SCENE_NUMBER-$IMAGE_NUMBER";

/// File stem of `path`, or `"video"` when it has none.
pub fn video_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "video".to_string())
}

/// Substitutes the macros present in `template`.
pub fn expand(
    template: &str,
    video_name: &str,
    scene_number: Option<usize>,
    image_number: Option<usize>,
) -> String {
    let mut name = template.replace("$VIDEO_NAME", video_name);
    if let Some(scene) = scene_number {
        name = name.replace("$SCENE_NUMBER", &format!("{:03}", scene));
    }
    if let Some(image) = image_number {
        name = name.replace("$IMAGE_NUMBER", &format!("{:02}", image));
    }
    name
}
