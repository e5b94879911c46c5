use thiserror::Error;

#[derive(Error, Debug)]
pub enum MissionError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("Failed to encode image: {0}")]
    ImageEncode(image::ImageError),

    #[error("Unsupported channel depth: {channels} (expected 1, 3 or 4)")]
    UnsupportedChannelDepth { channels: usize },

    #[error("Degenerate image geometry: {width}x{height}")]
    DegenerateGeometry { width: u32, height: u32 },

    #[error("Invalid path: {points} point(s), at least {required} required")]
    InvalidPath { points: usize, required: usize },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

pub type Result<T> = std::result::Result<T, MissionError>;
