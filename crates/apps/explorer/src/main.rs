use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use explorer::report::{render_comparison, render_matrix, to_json};
use explorer::{DatasetPaths, Explorer, ExplorerConfig};
use foundation::time::Time;
use layers::HighlightOutcome;
use layers::headless::HeadlessSurface;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Land cover change explorer")]
struct Args {
    /// Change map GeoJSON
    #[arg(long, default_value = "type_change_map.geojson")]
    change_map: PathBuf,

    /// Earlier year table
    #[arg(long, default_value = "bf_2021.csv")]
    before: PathBuf,

    /// Later year table
    #[arg(long, default_value = "af_2023.csv")]
    after: PathBuf,

    /// Province/municipality mapping with centroids
    #[arg(long, default_value = "sido_sgg_mapping_with_centroids.json")]
    regions: PathBuf,

    /// Optional JSON config; EXPLORER_* env vars override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List provinces, or municipalities of one province
    Regions {
        #[arg(long)]
        sido: Option<String>,
    },

    /// Compare category counts and tabulate transitions for a region
    Query {
        #[arg(long, default_value = "all")]
        sido: String,

        #[arg(long, default_value = "all")]
        sgg: String,

        /// Category to highlight (repeatable)
        #[arg(long)]
        highlight: Vec<String>,

        /// Also highlight every changed cell
        #[arg(long)]
        all_changes: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = ExplorerConfig::load(args.config.as_deref()).context("loading config")?;
    let paths = DatasetPaths {
        change_map: args.change_map,
        tabular_before: args.before,
        tabular_after: args.after,
        regions: args.regions,
    };

    let mut explorer = Explorer::new(config, HeadlessSurface::new());
    let failed = explorer.load_all(&paths);
    if failed > 0 {
        warn!("{failed} dataset(s) failed to load");
    }

    match args.command {
        Command::Regions { sido } => {
            let names = match sido.as_deref() {
                Some(sido) => explorer.municipalities(sido),
                None => explorer.provinces(),
            };
            if names.is_empty() {
                bail!("no regions available");
            }
            for name in names {
                println!("{name}");
            }
        }
        Command::Query {
            sido,
            sgg,
            highlight,
            all_changes,
            json,
        } => {
            let selection = explorer.selection_from_raw(&sido, &sgg)?;
            let mut report = explorer.run_aggregation(selection)?;
            if report.matrix.is_none() {
                report.matrix = explorer.take_transition_matrix();
            }

            for category in &highlight {
                match explorer.show_category(category, &report.selection, Time::ZERO)? {
                    HighlightOutcome::Shown { cells, .. } => {
                        info!(%category, cells, "highlighted")
                    }
                    HighlightOutcome::NoMatchingCells => {
                        println!("no changed cells for {category}")
                    }
                }
            }
            if all_changes {
                if let HighlightOutcome::Shown { cells, .. } = explorer.show_all_changes(&report.selection)? {
                    info!(cells, "highlighted all changes");
                }
            }
            while let Some(due) = explorer.highlights().next_animation_due() {
                explorer.advance(due);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&to_json(&report))?);
            } else {
                println!("{} (zoom {})", report.selection, report.view.zoom);
                print!("{}", render_comparison(&report.comparison));
                match &report.matrix {
                    Some(matrix) => print!("{}", render_matrix(matrix)),
                    None => println!("transition matrix unavailable: change map not loaded"),
                }
            }
        }
    }
    Ok(())
}
