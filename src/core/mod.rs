pub mod error;
pub mod grid;
pub mod heatmap;
pub mod log_scale;
pub mod paired;
pub mod scaling;
pub mod surface;
pub mod ticks;
