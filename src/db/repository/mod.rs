pub mod application;
pub mod consent;

pub use application::*;
pub use consent::*;
