use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use site_mask::{
    ArtifactNames, ExtractionConfig, GeoBoundingBox, GeoPoint, MissionError, MissionRequest,
    PixelPoint, RenderStyle,
};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

/// One mission run: source images, route endpoints and site extent
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct MissionConfig {
    /// Street/marker image the site mask is extracted from
    pub buildings_image: String,
    /// Orthophoto the route is drawn over
    pub satellite_image: String,
    pub output_dir: String,
    pub takeoff: PixelPoint,
    pub landing: PixelPoint,
    /// Top-left geographic corner as "(x, y)"
    pub top_left_coord: String,
    /// Bottom-right geographic corner as "(x, y)"
    pub bottom_right_coord: String,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub style: RenderStyle,
    #[serde(default)]
    pub outputs: ArtifactNames,
}

impl MissionConfig {
    /// Load MissionConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    /// Load MissionConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn bbox(&self) -> Result<GeoBoundingBox, CliError> {
        let top_left: GeoPoint = self.top_left_coord.parse()?;
        let bottom_right: GeoPoint = self.bottom_right_coord.parse()?;
        Ok(GeoBoundingBox::from_corners(top_left, bottom_right))
    }

    pub fn request(&self) -> Result<MissionRequest, CliError> {
        Ok(MissionRequest {
            takeoff: self.takeoff,
            landing: self.landing,
            bbox: self.bbox()?,
        })
    }
}
