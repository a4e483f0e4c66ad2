mod amino_acid;
mod cleavage;
mod mass_calculator;
mod protease;
mod sequence_position;
mod split;
mod terminus;

pub use amino_acid::*;
pub use cleavage::*;
pub use mass_calculator::*;
pub use protease::*;
pub use sequence_position::*;
pub use split::*;
pub use terminus::*;
