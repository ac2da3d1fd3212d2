extern crate serde;

pub mod config;
pub mod dissector;
pub mod error;
pub mod tree;
pub mod tvb;
pub mod utils;
