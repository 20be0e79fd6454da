pub mod player;
pub mod team;
pub mod validation;

pub use player::*;
pub use team::*;
pub use validation::*;
