pub mod export;
pub mod graph;
pub mod lang;
pub mod persistence;
