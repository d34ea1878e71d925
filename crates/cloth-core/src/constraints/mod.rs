pub mod distance;
pub mod sphere;
