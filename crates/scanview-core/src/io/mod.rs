pub mod image_io;
pub mod pnm;
pub mod raster;
