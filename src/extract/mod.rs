pub mod extractor;
pub mod grid_cache;
