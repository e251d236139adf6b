pub mod analytics;
pub mod pick;
pub mod prediction;
pub mod sport;
mod timestamp;

pub use analytics::*;
pub use pick::*;
pub use prediction::*;
pub use sport::*;
