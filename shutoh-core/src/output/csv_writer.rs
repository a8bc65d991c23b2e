//! Scene list as CSV.

use crate::error::CoreResult;
use crate::scene_manager::Scene;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneRecord {
    pub scene_number: usize,
    pub start_frame: u64,
    pub start_time: String,
    pub end_frame: u64,
    pub end_time: String,
}

/// Converts scenes into CSV rows.
///
/// Adjacent scenes share their boundary frame, which is attributed to the
/// earlier scene. Every scene after the first therefore starts one frame
/// after its boundary.
pub fn scene_records(scenes: &[Scene]) -> Vec<SceneRecord> {
    scenes
        .iter()
        .enumerate()
        .map(|(scene_number, (start, end))| {
            let start_frame = if scene_number == 0 {
                start.frame_num()
            } else {
                start.frame_num() + 1
            };
            SceneRecord {
                scene_number,
                start_frame,
                start_time: start.to_string(),
                end_frame: end.frame_num(),
                end_time: end.to_string(),
            }
        })
        .collect()
}

/// Writes the scene table to any writer, header included.
pub fn write_scenes<W: Write>(writer: W, scenes: &[Scene]) -> CoreResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in scene_records(scenes) {
        csv.serialize(record)?;
    }
    if scenes.is_empty() {
        csv.write_record([
            "scene_number",
            "start_frame",
            "start_time",
            "end_frame",
            "end_time",
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the scene table to `output_dir/file_name` and returns the path.
pub fn write_scenes_to_file(
    output_dir: &Path,
    file_name: &str,
    scenes: &[Scene],
) -> CoreResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    let file = File::create(&path)?;
    write_scenes(file, scenes)?;
    log::info!("Wrote {} scenes to {}", scenes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timecode::FrameTimecode;

    fn scene(start: u64, end: u64) -> Scene {
        (
            FrameTimecode::from_frames(start, 25.0).unwrap(),
            FrameTimecode::from_frames(end, 25.0).unwrap(),
        )
    }

    #[test]
    fn test_records_shift_later_starts() {
        let records = scene_records(&[scene(0, 50), scene(50, 100)]);
        assert_eq!(records[0].start_frame, 0);
        assert_eq!(records[0].end_frame, 50);
        assert_eq!(records[1].start_frame, 51);
        assert_eq!(records[1].start_time, "00:00:02.000");
        assert_eq!(records[1].end_time, "00:00:04.000");
    }

    #[test]
    fn test_write_scenes() {
        let mut out = Vec::new();
        write_scenes(&mut out, &[scene(0, 25), scene(25, 30)]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "scene_number,start_frame,start_time,end_frame,end_time\n\
             0,0,00:00:00.000,25,00:00:01.000\n\
             1,26,00:00:01.000,30,00:00:01.200\n"
        );
    }

    #[test]
    fn test_write_empty_table_has_header() {
        let mut out = Vec::new();
        write_scenes(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "scene_number,start_frame,start_time,end_frame,end_time\n"
        );
    }
}
