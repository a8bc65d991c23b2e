//! `list-scenes`: prints the scene table and writes it as CSV.

use crate::cli::{Cli, ListScenesArgs};
use shutoh_core::CoreResult;
use shutoh_core::output::template::DEFAULT_CSV_TEMPLATE;
use shutoh_core::output::{expand, video_name, write_scenes, write_scenes_to_file};

pub fn run_list_scenes(cli: &Cli, args: &ListScenesArgs) -> CoreResult<()> {
    let (_video, scenes) = super::detect(cli)?;

    if args.no_output_file {
        let stdout = std::io::stdout();
        write_scenes(stdout.lock(), &scenes)?;
        return Ok(());
    }

    for (number, (start, end)) in scenes.iter().enumerate() {
        println!("Scene {:3}: {} - {}", number, start, end);
    }

    let template = cli.filename.as_deref().unwrap_or(DEFAULT_CSV_TEMPLATE);
    let file_name = expand(template, &video_name(&cli.input), None, None);
    let path = write_scenes_to_file(&cli.output, &file_name, &scenes)?;
    println!("Scene list written to {}", path.display());
    Ok(())
}
