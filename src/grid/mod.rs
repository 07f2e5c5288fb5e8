pub mod axis;
pub mod container;
pub mod decoded;
pub mod decoder;
pub mod error;
pub mod locator;
#[cfg(feature = "netcdf")]
pub mod netcdf_container;
pub mod raw_binary;
pub mod self_describing;
pub mod time_axis;
