mod applied;
mod declaration;
mod definition;
mod mass_correction_tags;
mod registry;

pub use applied::*;
pub use declaration::*;
pub use definition::*;
pub use mass_correction_tags::*;
pub use registry::*;
