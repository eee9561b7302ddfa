//! # Data Transfer Objects

pub mod raster_options;
