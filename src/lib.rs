// Box packing trainer launcher
// Library exports

pub mod cli;
pub mod config;
pub mod errors;
pub mod training;
