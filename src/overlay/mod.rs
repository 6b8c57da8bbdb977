pub mod frame;
pub mod geometry;
pub mod placement;
