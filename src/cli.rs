// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "releasectl")]
#[command(about = "Build, push, and roll out a container image to an orchestrated service")]
#[command(version)]
pub struct Cli {
    /// Config file (default: release.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Machine-readable output and logs
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build, push, roll out, and verify the service
    Release(ReleaseArgs),

    /// Create a release.yml template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ReleaseArgs {
    /// Build and push the image, then stop
    #[arg(long, conflicts_with = "skip_build")]
    pub build_only: bool,

    /// Roll out the image the service already references
    #[arg(long)]
    pub skip_build: bool,

    /// Do not probe the service after it converges
    #[arg(long)]
    pub skip_health_check: bool,

    /// Release tag (default: UTC timestamp)
    #[arg(long)]
    pub tag: Option<String>,
}
