//! `split-video`: one clip per detected scene.

use crate::cli::{Cli, SplitVideoArgs};
use shutoh_core::CoreResult;
use shutoh_core::output::template::DEFAULT_SPLIT_TEMPLATE;
use shutoh_core::output::{SplitOptions, VideoSplitter, video_name};

pub fn run_split_video(cli: &Cli, args: &SplitVideoArgs) -> CoreResult<()> {
    let (_video, scenes) = super::detect(cli)?;

    let options = SplitOptions {
        copy: args.copy,
        crf: args.crf,
        preset: args.preset.clone(),
        args: args.args.clone(),
        template: cli
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_SPLIT_TEMPLATE.to_string()),
        ..SplitOptions::default()
    };

    let splitter = VideoSplitter::new(&cli.output, options);
    let clips = splitter.split_video(&cli.input, &video_name(&cli.input), &scenes)?;
    println!("Wrote {} clips to {}", clips.len(), cli.output.display());
    Ok(())
}
