use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use mission_cli::MissionConfig;
use site_mask::{
    extract_mask, project_path, AlphaPolicy, ArtifactSink, DirectorySink, ExtractionConfig,
    GeoBoundingBox, GeoPoint, ImageCodec, ImageCrateCodec, MaskExtractor, MissionPlanner,
    PixelPoint, write_atomic,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the site mask from an image and save it as PNG
    Extract {
        /// Source image (gray, color or color+alpha)
        #[arg(short, long)]
        input: PathBuf,
        /// Where to write the mask (foreground white)
        #[arg(short, long)]
        output: PathBuf,
        /// Lower intensity bound (needs --upper as well)
        #[arg(long)]
        lower: Option<u8>,
        /// Upper intensity bound (needs --lower as well)
        #[arg(long)]
        upper: Option<u8>,
        /// Minimum component area in pixels
        #[arg(long, default_value_t = ExtractionConfig::DEFAULT_MIN_AREA)]
        min_area: u32,
        /// How alpha is treated for 4-channel images
        #[arg(long, default_value = "discard")]
        alpha: AlphaPolicy,
    },
    /// Project pixel coordinates onto a geographic bounding box
    Project {
        /// Image width in pixels
        #[arg(long)]
        width: u32,
        /// Image height in pixels
        #[arg(long)]
        height: u32,
        /// Top-left corner as "(x, y)"
        #[arg(long)]
        top_left: GeoPoint,
        /// Bottom-right corner as "(x, y)"
        #[arg(long)]
        bottom_right: GeoPoint,
        /// Pixel points as "x,y", in route order
        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<PixelPoint>,
    },
    /// Run a full mission from a configuration file
    Plan {
        /// Path to the TOML or JSON mission file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the JSON schema of the mission file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { input, output, lower, upper, min_area, alpha } => {
            extract(&input, &output, lower, upper, min_area, alpha)?;
        }
        Commands::Project { width, height, top_left, bottom_right, points } => {
            let bbox = GeoBoundingBox::from_corners(top_left, bottom_right);
            let geo_path = project_path(&points, height, width, &bbox)?;
            println!("{}", geo_path.to_json_pretty()?);
        }
        Commands::Plan { config } => {
            plan(&config)?;
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(MissionConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn extract(
    input: &Path,
    output: &Path,
    lower: Option<u8>,
    upper: Option<u8>,
    min_area: u32,
    alpha: AlphaPolicy,
) -> Result<()> {
    if lower.is_some() != upper.is_some() {
        warn!("Only one threshold bound given; using the default band [245, 249]");
    }

    let codec = ImageCrateCodec;
    let image = codec.load(input)?;

    let mask = if alpha == AlphaPolicy::default() {
        extract_mask(&image, lower, upper, min_area)?.1
    } else {
        MaskExtractor::builder()
            .thresholds(lower, upper)
            .min_area(min_area)
            .alpha_policy(alpha)
            .build()
            .extract(&image)?
            .mask
    };

    let png = codec.encode_png(&mask.to_raster().to_rgb_image())?;
    write_atomic(output, &png)?;

    info!(
        "✅ Mask written to {:?} ({} foreground pixels)",
        output,
        mask.foreground_count()
    );
    Ok(())
}

fn plan(config_path: &Path) -> Result<()> {
    let config = MissionConfig::from_file(config_path)?;
    info!("Mission: {:?}", config);

    let codec = ImageCrateCodec;
    let buildings = codec.load(Path::new(&config.buildings_image))?;
    let satellite = codec.load(Path::new(&config.satellite_image))?;

    let planner = MissionPlanner::from_config(&config.extraction, config.style);
    let artifacts = planner.plan(&buildings, &satellite, &config.request()?)?;

    let mut sink = DirectorySink::with_names(&config.output_dir, config.outputs.clone());
    sink.emit(&artifacts)?;

    info!("🛰️ Route image: {:?}", sink.route_image_path());
    info!("🛰️ Satellite image: {:?}", sink.satellite_image_path());
    info!("🛰️ Coordinates: {:?}", sink.coordinates_path());
    info!("✅ Mission created ({} waypoints)", artifacts.geo_path.len());
    Ok(())
}
