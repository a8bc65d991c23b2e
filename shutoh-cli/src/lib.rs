// shutoh-cli/src/lib.rs
//
// Library portion of the Shutoh CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod reporting;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use commands::list_scenes::run_list_scenes;
pub use commands::save_images::run_save_images;
pub use commands::split_video::run_split_video;

use shutoh_core::CoreResult;

/// Runs the parsed command line.
pub fn run(cli: &Cli) -> CoreResult<()> {
    match &cli.command {
        Commands::ListScenes(args) => run_list_scenes(cli, args),
        Commands::SplitVideo(args) => run_split_video(cli, args),
        Commands::SaveImages(args) => run_save_images(cli, args),
    }
}
