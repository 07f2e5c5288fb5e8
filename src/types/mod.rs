pub mod config;
pub mod data_point;
pub mod dataset_kind;
pub mod selection;
pub mod series;
