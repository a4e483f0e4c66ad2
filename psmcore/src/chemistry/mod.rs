#[macro_use]
mod composition;
mod element;
mod formula;

pub use composition::*;
pub use element::*;
pub use formula::*;
