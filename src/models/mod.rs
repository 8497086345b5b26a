pub mod category;
pub mod manifest;
pub mod phase;

pub use category::Category;
pub use phase::{ActivePhase, EditTarget, Phase};
