use anyhow::Context;
use clap::Parser;
use median_grid::pipeline::{PipelineConfig, quantize_file};
use std::path::PathBuf;

/// Reduce an image to a grid of per-block median colors
#[derive(Parser, Debug)]
#[command(name = "median_grid")]
#[command(version)]
#[command(about = "Reduce an image to a width x height grid of per-block median colors", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Args {
    /// Image to read
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the reduced image; the format follows the extension
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Output width in cells
    width: i64,

    /// Output height in cells
    height: i64,

    /// Reduce on this many worker threads instead of the calling thread
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self) -> anyhow::Result<PipelineConfig> {
        let config =
            PipelineConfig::new(self.width, self.height).context("invalid output grid size")?;
        Ok(match self.workers {
            Some(workers) => config.with_workers(workers),
            None => config,
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_module("median_grid", level)
        .filter_module("median_grid_cli", level)
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Argument Parsing & Setup ---
    let args = Args::parse();
    init_logging(args.verbose);

    // --- 2. Validation ---
    // Sizes are checked before the input is opened.
    let config = args.pipeline_config()?;

    // --- 3. Reduction ---
    let written = quantize_file(&config, &args.input, &args.output)
        .await
        .with_context(|| format!("failed to reduce {}", args.input.display()))?;

    log::info!(
        "Processing complete. {} grid saved to {}",
        written,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_positionals() {
        let args = Args::try_parse_from(["median_grid", "in.png", "out.png", "16", "9"]).unwrap();
        assert_eq!(args.input, PathBuf::from("in.png"));
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!((args.width, args.height), (16, 9));
        assert_eq!(args.workers, None);

        let config = args.pipeline_config().unwrap();
        assert_eq!(config.target.width(), 16);
        assert_eq!(config.target.height(), 9);
        assert_eq!(config.workers, None);
    }

    #[test]
    fn all_positionals_are_required() {
        assert!(Args::try_parse_from(["median_grid", "in.png", "out.png", "16"]).is_err());
    }

    #[test]
    fn non_numeric_size_is_a_parse_error() {
        assert!(Args::try_parse_from(["median_grid", "in.png", "out.png", "wide", "9"]).is_err());
    }

    #[test]
    fn zero_or_negative_sizes_name_the_field() {
        let args = Args::try_parse_from(["median_grid", "in.png", "out.png", "0", "4"]).unwrap();
        let err = args.pipeline_config().unwrap_err();
        assert!(format!("{err:#}").contains("width must be one or more, got 0"));

        let args = Args::try_parse_from(["median_grid", "in.png", "out.png", "4", "-2"]).unwrap();
        let err = args.pipeline_config().unwrap_err();
        assert!(format!("{err:#}").contains("height must be one or more, got -2"));
    }

    #[test]
    fn workers_flag_selects_parallel_reducer() {
        let args =
            Args::try_parse_from(["median_grid", "-j", "4", "in.png", "out.png", "2", "2"]).unwrap();
        assert_eq!(args.pipeline_config().unwrap().workers, Some(4));
    }
}
