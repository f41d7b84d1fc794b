pub mod document;
pub mod import;

pub use document::*;
pub use import::*;
