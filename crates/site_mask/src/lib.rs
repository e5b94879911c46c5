//! # Site Mask Extraction and Route Projection
//!
//! Extracts a marker/rooftop mask from an aerial raster, projects pixel
//! routes onto a geographic bounding box and renders the route over both the
//! mask and the satellite image.
//!
//! ## Core Features
//!
//! - **Channel collapse**: gray, BGR and BGRA rasters reduce to one intensity plane
//! - **Band threshold**: inclusive intensity range, defaulting to [245, 249]
//! - **Region filtering**: 8-connected components below a minimum area are removed
//! - **Geo projection**: independent per-axis scaling from pixels to the bounding box
//! - **Rendering & export**: copy-on-write route drawing, atomic file output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use site_mask::{extract_mask, project_path, GeoBoundingBox, ImageCodec, ImageCrateCodec, PixelPoint};
//!
//! let image = ImageCrateCodec.load("streets_with_markers.png".as_ref())?;
//! let (_, mask) = extract_mask(&image, None, None, 50)?;
//!
//! let path = [PixelPoint::new(12, 40), PixelPoint::new(310, 220)];
//! let bbox = GeoBoundingBox::new(178_000.0, 666_000.0, 179_000.0, 665_000.0);
//! let geo = project_path(&path, mask.height(), mask.width(), &bbox)?;
//! println!("{}", geo.to_json_pretty()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Full Mission
//!
//! ```rust,no_run
//! use site_mask::*;
//!
//! let codec = ImageCrateCodec;
//! let buildings = codec.load("streets_with_markers.png".as_ref())?;
//! let satellite = codec.load("ortho.png".as_ref())?;
//!
//! let request = MissionRequest {
//!     takeoff: PixelPoint::new(10, 10),
//!     landing: PixelPoint::new(200, 150),
//!     bbox: GeoBoundingBox::new(0.0, 100.0, 100.0, 0.0),
//! };
//! let artifacts = MissionPlanner::default().plan(&buildings, &satellite, &request)?;
//! artifacts.write_to(&mut DirectorySink::new("static/outputs"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod config;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod projection;
pub mod render;
pub mod io;
pub mod mission;

// Re-exports for convenience
pub use error::{MissionError, Result};
pub use types::*;
pub use config::*;
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{extract_mask, Extraction, MaskExtractor, builder::MaskExtractorBuilder};
pub use projection::{project_path, GeoProjector};
pub use render::{render_path, RenderedRoute, RouteRenderer};
pub use io::*;
pub use mission::{MissionArtifacts, MissionPlanner, MissionRequest};
