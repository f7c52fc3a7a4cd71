pub mod types;
pub mod render;

pub use types::*;
pub use render::{build_decoration, decoration_text, DecorationRenderer};
