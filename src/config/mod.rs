pub mod sanity;
pub mod volume;

pub use sanity::*;
pub use volume::*;
