use std::path::PathBuf;
use std::process;

use clap::Parser;
use iconforge::commands::generate::{self, StepStatus};
use iconforge::config::Config;
use iconforge::constants::{DEFAULT_INPUT, ICONUTIL_PROGRAM, MAX_RASTER_SIZE};
use iconforge::platform::IcnsBackend;

#[derive(Parser)]
#[command(name = "iconforge")]
#[command(about = "Generate PNG, ICO and ICNS icons from an SVG source")]
#[command(version)]
struct Cli {
    /// SVG source file (outputs are written next to it)
    #[arg(default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Comma-separated PNG sizes to render (1 to 4096)
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = clap::value_parser!(u32).range(1..=MAX_RASTER_SIZE as i64)
    )]
    sizes: Vec<u32>,

    /// How to produce the macOS .icns file
    #[arg(long, value_enum, default_value_t = IcnsBackend::Auto)]
    icns_backend: IcnsBackend,

    /// Program used by the iconutil backend
    #[arg(long, default_value = ICONUTIL_PROGRAM)]
    iconutil: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = Config::new(cli.input, &cli.sizes, cli.icns_backend).with_iconutil(cli.iconutil);

    println!("Generating icons...");
    match generate::run(&config) {
        Ok(report) => {
            if let StepStatus::Skipped(reason) = &report.icns {
                log::info!("macOS ICNS skipped: {}", reason);
            }
            if report.all_succeeded() {
                println!("Icon generation complete");
            } else {
                println!("Icon generation finished with errors");
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
