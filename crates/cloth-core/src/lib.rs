//! Position-based cloth: a square particle lattice integrated with Verlet,
//! held together by sequentially relaxed distance constraints and draped
//! over a static sphere.

pub mod config;
pub mod constraints;
pub mod error;
pub mod grid;
pub mod mesh;
pub mod particle;
pub mod solver;

pub use config::{ClothConfig, SphereConfig};
pub use error::{ClothError, ClothResult};
pub use mesh::ClothVertex;
pub use solver::{step_all, ClothSimulator};
