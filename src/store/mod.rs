pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::*;
pub use file::*;
pub use memory::*;
pub use traits::*;
