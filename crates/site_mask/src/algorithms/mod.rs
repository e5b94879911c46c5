pub mod preprocessing;
pub mod thresholding;
pub mod labeling;
pub mod filtering;

pub use preprocessing::*;
pub use thresholding::*;
pub use labeling::*;
pub use filtering::*;
