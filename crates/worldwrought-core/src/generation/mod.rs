//! Generation - creation of characters and citizens

mod character;
mod citizens;
mod names;

pub use character::*;
pub use citizens::*;
pub use names::*;
