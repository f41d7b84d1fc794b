pub mod catalog;
pub mod error;
pub mod repository;
pub mod resolve;

pub use catalog::*;
pub use error::*;
pub use repository::*;
pub use resolve::*;
