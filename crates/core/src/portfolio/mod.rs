pub mod holdings;
pub mod lots;

pub use holdings::*;
pub use lots::*;
