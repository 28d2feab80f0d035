use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::{error, info};

mod assemble;
mod error;
mod fetch;
mod logging;
mod tile;
mod utils;

use fetch::grid::GridFetcher;
use fetch::{FetchConfig, DEFAULT_MAX_ROW_COL_COUNT};
use utils::files::{dest_from_base_url, prettify_dir_name};
use utils::http::DEFAULT_TIMEOUT_SECS;

/// Download tile grids and stitch them back into a single image
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble the {col}_{row}.jpg tiles in a folder into <folder>.jpg
    Assemble {
        /// Folder containing the tiles
        folder: PathBuf,

        /// Print a JSON report on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Assemble every tile folder under a root directory
    AssembleAll {
        /// Directory whose subfolders hold tiles
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Print a JSON report on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Download a tile grid from {base_url}{col}_{row}.jpg
    Fetch {
        /// URL prefix the tile names are appended to
        base_url: String,

        /// Folder to save tiles in (defaults to the last segment of the base URL)
        dest: Option<String>,

        /// Abort when the row or column counter reaches this value
        #[arg(short, long, default_value_t = DEFAULT_MAX_ROW_COL_COUNT)]
        max_row_col_count: u32,

        /// Turn a hyphenated destination name into words, e.g. "Starry Night"
        #[arg(long, default_value_t = false)]
        prettify: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout: u64,

        /// Print a JSON report on stdout
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}

/// Destination folder for a fetch. Only the final path component is prettified.
fn resolve_dest(base_url: &str, dest: Option<String>, prettify: bool) -> Option<PathBuf> {
    let dest = PathBuf::from(dest.or_else(|| dest_from_base_url(base_url))?);
    if !prettify {
        return Some(dest);
    }

    let name = dest.file_name()?.to_str()?;
    Some(dest.with_file_name(prettify_dir_name(name)))
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    match args.command {
        Commands::Assemble { folder, json } => match assemble::assemble_folder(&folder) {
            Ok(report) => {
                info!(
                    output = %report.output.display(),
                    width = report.width,
                    height = report.height,
                    "Assembled {} tiles",
                    report.tiles
                );
                if json {
                    print_json(&report);
                }
            }
            Err(e) => {
                let code = e.exit_code();
                if code == 0 {
                    info!("{}", e);
                } else {
                    error!("{}", e);
                }
                process::exit(code);
            }
        },
        Commands::AssembleAll { root, json } => match assemble::assemble_all(&root) {
            Ok(entries) => {
                let assembled = entries.iter().filter(|e| e.report.is_some()).count();
                info!(assembled, total = entries.len(), "Batch complete");
                if json {
                    print_json(&entries);
                }
            }
            Err(e) => {
                error!("{}", e);
                process::exit(e.exit_code());
            }
        },
        Commands::Fetch {
            base_url,
            dest,
            max_row_col_count,
            prettify,
            timeout,
            json,
        } => {
            let Some(dest) = resolve_dest(&base_url, dest, prettify) else {
                error!(%base_url, "Cannot derive a destination folder from the URL, pass DEST");
                process::exit(1);
            };

            let mut config =
                FetchConfig::new(base_url, dest).with_max_row_col_count(max_row_col_count);
            config.timeout = Duration::from_secs(timeout);
            info!(base_url = %config.base_url, dest = %config.dest.display(), "Fetching tiles");

            let result = match GridFetcher::http(config) {
                Ok(fetcher) => fetcher.run().await,
                Err(e) => Err(e),
            };

            match result {
                Ok(report) => {
                    if json {
                        print_json(&report);
                    }
                }
                Err(e) => {
                    error!("{}", e);
                    process::exit(e.exit_code());
                }
            }
        }
    }
}
