pub mod codec;
pub mod export;
pub mod route_geojson;

pub use codec::*;
pub use export::*;
