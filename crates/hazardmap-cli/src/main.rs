use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use hazardmap_cli::commands::classify::{handle_classify, ClassifyArgs};
use hazardmap_cli::commands::legend::handle_legend;
use hazardmap_cli::commands::measure::handle_measure;
use hazardmap_cli::commands::reach::{handle_reach, BoundingBox, ReachArgs};
use hazardmap_cli::commands::reverse::handle_reverse;
use hazardmap_cli::commands::search::handle_search;
use hazardmap_cli::commands::shelter::handle_shelter;
use hazardmap_cli::commands::AppContext;
use hazardmap_cli::logging::{init_logging, LogFormat, LoggingConfig};
use hazardmap_cli::output::OutputFormat;
use hazardmap_lib::LonLat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Evacuation shelter and hazard map utilities")]
struct Cli {
    /// Directory holding shelter_point.json and hazard_legend.json.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Result format on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Log format on stderr (defaults to LOG_FORMAT, then text).
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search shelters by facility name or address.
    Search {
        /// Free-text query.
        query: String,
    },
    /// Turn a coordinate pair of unknown order into positions.
    Reverse {
        #[arg(allow_negative_numbers = true)]
        first: f64,
        #[arg(allow_negative_numbers = true)]
        second: f64,
    },
    /// Show details of the best-matching shelter.
    Shelter {
        query: String,
    },
    /// Print the legend of a hazard layer.
    Legend {
        /// Layer id, e.g. flood_layer.
        layer: String,
    },
    /// Classify the hazard raster at a position.
    Classify {
        #[arg(long)]
        layer: String,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, default_value_t = 15.0)]
        zoom: f64,
    },
    /// Cumulative distances along positions given as lon,lat.
    Measure {
        #[arg(required = true, allow_hyphen_values = true)]
        positions: Vec<LonLat>,
    },
    /// Dissolved reach polygon around shelters.
    Reach {
        /// Radius in metres.
        #[arg(long)]
        radius: f64,
        /// Only shelters inside minLon,minLat,maxLon,maxLat.
        #[arg(long, allow_hyphen_values = true)]
        bbox: Option<BoundingBox>,
        /// Map zoom; below 13 the reach area is hidden.
        #[arg(long)]
        zoom: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig::resolve(cli.log_format));

    let ctx = AppContext::new(cli.data_dir, cli.format);
    match cli.command {
        Command::Search { query } => handle_search(&ctx, &query),
        Command::Reverse { first, second } => handle_reverse(&ctx, first, second),
        Command::Shelter { query } => handle_shelter(&ctx, &query),
        Command::Legend { layer } => handle_legend(&ctx, &layer),
        Command::Classify {
            layer,
            lon,
            lat,
            zoom,
        } => {
            let args = ClassifyArgs {
                layer,
                position: LonLat::new(lon, lat),
                zoom,
            };
            handle_classify(&ctx, &args).await
        }
        Command::Measure { positions } => handle_measure(&ctx, &positions),
        Command::Reach { radius, bbox, zoom } => handle_reach(
            &ctx,
            &ReachArgs {
                radius_m: radius,
                bbox,
                zoom,
            },
        ),
    }
}
