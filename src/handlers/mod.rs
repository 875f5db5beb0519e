pub mod ask;
pub mod datasets;
