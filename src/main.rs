use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use nef_encode_rs::image_pipeline::{
    ConversionConfig, RawImageReader, RawLoaderReader, RawToNefPipeline, TiffBayerReader,
};
use nef_encode_rs::logger;

use tracing::{error, info};

/// Encode a Bayer mosaic as a lossless NEF strip
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera RAW file, or a TIFF holding a 16-bit mosaic or an RGB image
    input: PathBuf,

    /// Where to write the encoded strip
    output: PathBuf,

    /// Predictor seed, decimal or 0x-prefixed hex [default: 0x0800]
    #[arg(value_parser = parse_predictive_value)]
    starting_predictive_value: Option<u16>,

    /// Black level RGB TIFF input is scaled onto
    #[arg(long, default_value_t = 0)]
    black_level: u16,
}

fn parse_predictive_value(arg: &str) -> Result<u16, String> {
    let value = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    value.map_err(|e| format!("invalid starting predictive value {arg:?}: {e}"))
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
}

fn run<R: RawImageReader>(
    pipeline: RawToNefPipeline<R>,
    input: &Path,
    output: &Path,
) -> anyhow::Result<usize> {
    info!(
        "Starting predictive value: {:#06x}",
        pipeline.config().starting_predictive_value
    );
    let bytes = pipeline
        .convert_file(input, output)
        .with_context(|| format!("converting {}", input.display()))?;
    Ok(bytes)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init();

    let mut builder = ConversionConfig::builder().black_level(args.black_level);
    if let Some(value) = args.starting_predictive_value {
        builder = builder.starting_predictive_value(value);
    }
    let config = builder.build();

    info!("Starting nef_encode...");

    let result = if is_tiff(&args.input) {
        run(RawToNefPipeline::<TiffBayerReader>::for_tiff(config), &args.input, &args.output)
    } else {
        run(RawToNefPipeline::<RawLoaderReader>::new(config), &args.input, &args.output)
    };

    match result {
        Ok(bytes) => {
            info!("Wrote {} encoded bytes to {}", bytes, args.output.display());
            Ok(())
        }
        Err(e) => {
            error!("Conversion failed: {:#}", e);
            Err(e)
        }
    }
}
