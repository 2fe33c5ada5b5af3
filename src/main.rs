use asset_resizer::cli::Args;
use asset_resizer::error::{ResizerError, Result};
use asset_resizer::{info, logger, resize_file_at_path, scan_dir, PngCodec};
use clap::error::ErrorKind;
use clap::Parser;
use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            let err = ResizerError::Usage(e.render().to_string());
            eprint!("{}", err);
            return ExitCode::from(err.exit_code());
        }
    };

    logger::set_verbosity(args.verbosity());

    match run(&args) {
        Ok(()) => {
            info!("\n✅ Done!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            asset_resizer::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let options = args.resize_options();
    let codec = PngCodec::new(args.optimize);

    let metadata = fs::metadata(&args.path).map_err(|source| ResizerError::PathStat {
        path: args.path.clone(),
        source,
    })?;

    if metadata.is_dir() {
        scan_dir(&codec, &args.path, &options).into_result()?;
    } else {
        resize_file_at_path(&codec, &args.path, &options)?;
    }

    Ok(())
}
