pub mod annotation;
pub mod catalog;
pub mod config;
pub mod consts;
pub mod error;
pub mod geometry;
pub mod input;
pub mod io;
pub mod mosaic;
pub mod overlay;
pub mod pyramid;
pub mod tile_view;
pub mod viewport;
