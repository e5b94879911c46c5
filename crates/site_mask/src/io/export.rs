use std::{
    io::Write,
    path::{Path, PathBuf},
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;
use crate::{
    error::Result,
    io::ImageCrateCodec,
    mission::MissionArtifacts,
    traits::{ArtifactSink, ImageCodec},
};

/// File names of the three mission outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ArtifactNames {
    pub route_image: String,
    pub satellite_image: String,
    pub coordinates: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            route_image: "auto_route.png".to_string(),
            satellite_image: "mission_satellite.png".to_string(),
            coordinates: "auto_route_coordinates.txt".to_string(),
        }
    }
}

/// Writes mission outputs into a directory. Each file is written to a
/// temporary sibling and renamed into place, so readers never see a partial
/// artifact.
pub struct DirectorySink {
    dir: PathBuf,
    names: ArtifactNames,
    codec: Box<dyn ImageCodec>,
}

impl DirectorySink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self::with_names(dir, ArtifactNames::default())
    }

    pub fn with_names<P: AsRef<Path>>(dir: P, names: ArtifactNames) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            names,
            codec: Box::new(ImageCrateCodec),
        }
    }

    pub fn with_codec<C: ImageCodec + 'static>(mut self, codec: C) -> Self {
        self.codec = Box::new(codec);
        self
    }

    pub fn route_image_path(&self) -> PathBuf {
        self.dir.join(&self.names.route_image)
    }

    pub fn satellite_image_path(&self) -> PathBuf {
        self.dir.join(&self.names.satellite_image)
    }

    pub fn coordinates_path(&self) -> PathBuf {
        self.dir.join(&self.names.coordinates)
    }
}

impl ArtifactSink for DirectorySink {
    fn emit(&mut self, artifacts: &MissionArtifacts) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let route = self.codec.encode_png(&artifacts.route_image)?;
        let satellite = self.codec.encode_png(&artifacts.satellite_image)?;
        let coordinates = artifacts.geo_path.to_json_pretty()?;

        write_atomic(&self.route_image_path(), &route)?;
        write_atomic(&self.satellite_image_path(), &satellite)?;
        write_atomic(&self.coordinates_path(), coordinates.as_bytes())?;

        info!(
            dir = %self.dir.display(),
            route_image = %self.names.route_image,
            satellite_image = %self.names.satellite_image,
            coordinates = %self.names.coordinates,
            "wrote mission artifacts"
        );
        Ok(())
    }
}

/// Keeps encoded mission outputs in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub route_png: Option<Vec<u8>>,
    pub satellite_png: Option<Vec<u8>>,
    pub coordinates_json: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtifactSink for MemorySink {
    fn emit(&mut self, artifacts: &MissionArtifacts) -> Result<()> {
        let codec = ImageCrateCodec;
        self.route_png = Some(codec.encode_png(&artifacts.route_image)?);
        self.satellite_png = Some(codec.encode_png(&artifacts.satellite_image)?);
        self.coordinates_json = Some(artifacts.geo_path.to_json_pretty()?);
        Ok(())
    }
}

/// Write `bytes` to `target` through a temporary file in the same directory.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target)?;
    Ok(())
}
