pub mod historical;
pub mod prediction;

pub use historical::*;
pub use prediction::*;
