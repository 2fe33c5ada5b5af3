use crate::codec::OptimizeLevel;
use crate::logger::Verbosity;
use crate::planner::UnmarkedPolicy;
use crate::processing::ResizeOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "asset-resizer",
    about = "Generate @1x, @2x and @3x PNG variants from a high-resolution source",
    long_about = "asset-resizer reads a PNG whose name ends in @2x or @3x and writes the full \
                  1x/2x/3x set next to it. Given a directory, it processes every PNG inside \
                  (recursively by default) and writes a Contents.json manifest per directory.",
    version,
    after_help = "EXAMPLES:\n  \
    asset-resizer icons/logo@3x.png\n  \
    asset-resizer ./Assets.xcassets\n  \
    asset-resizer ./icons --no-recursive --no-manifest -O fast"
)]
pub struct Args {
    #[arg(
        value_name = "PATH",
        help = "PNG file or directory to resize",
        long_help = "A single PNG file, or a directory whose PNG files should all be resized. \
                     Files without an @2x or @3x marker are treated as @3x unless \
                     --require-marker is given."
    )]
    pub path: PathBuf,

    #[arg(long, help = "Do not descend into subdirectories")]
    pub no_recursive: bool,

    #[arg(long, help = "Do not write Contents.json manifests in directory mode")]
    pub no_manifest: bool,

    #[arg(
        long,
        help = "Fail on files without an @2x or @3x marker",
        long_help = "By default a file whose name carries neither @2x nor @3x is assumed to be \
                     the largest (@3x) variant. With this flag such files are reported as errors."
    )]
    pub require_marker: bool,

    #[arg(
        short = 'O',
        long,
        value_enum,
        default_value_t = OptimizeLevel::Off,
        help = "Lossless PNG optimization of written variants"
    )]
    pub optimize: OptimizeLevel,

    #[arg(short, long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(short, long, help = "Print every file written")]
    pub verbose: bool,
}

impl Args {
    pub fn resize_options(&self) -> ResizeOptions {
        let unmarked = if self.require_marker {
            UnmarkedPolicy::Reject
        } else {
            UnmarkedPolicy::AssumeTriple
        };
        ResizeOptions::new(!self.no_recursive, !self.no_manifest, unmarked)
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
