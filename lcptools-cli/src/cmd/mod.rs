pub mod parse;
pub mod show;
pub mod stats;
