//! `save-images`: still images from every detected scene.

use crate::cli::{Cli, SaveImagesArgs};
use shutoh_core::CoreResult;
use shutoh_core::output::template::DEFAULT_IMAGE_TEMPLATE;
use shutoh_core::output::{ImageExtractor, ImageExtractorOptions, video_name};

pub fn run_save_images(cli: &Cli, args: &SaveImagesArgs) -> CoreResult<()> {
    let (mut video, scenes) = super::detect(cli)?;

    let options = ImageExtractorOptions {
        num_images: args.num_images as usize,
        format: args.format.into(),
        quality: args.quality,
        compression: args.compression,
        frame_margin: args.frame_margin,
        scale: args.scale,
        width: args.width.unwrap_or(0),
        height: args.height.unwrap_or(0),
        template: cli
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_IMAGE_TEMPLATE.to_string()),
    };

    let extractor = ImageExtractor::new(&cli.output, options);
    let images = extractor.save_images(&mut video, &video_name(&cli.input), &scenes)?;
    println!("Saved {} images to {}", images.len(), cli.output.display());
    Ok(())
}
