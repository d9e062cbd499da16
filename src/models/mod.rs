pub mod application;
pub mod consent;
pub mod enums;

pub use application::*;
pub use consent::*;
pub use enums::*;
