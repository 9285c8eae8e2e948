//! Structural validators, one module per concern.

pub mod elements;
pub mod ghosts;
pub mod junctions;
pub mod visibility;
