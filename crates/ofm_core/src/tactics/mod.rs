pub mod formation;

pub use formation::{Formation, FormationShape, FormationSnapshot};
