pub mod api;
pub mod blocks;
