// Crate root library declaration and module exports.
pub mod builder;
pub mod cli;
pub mod color_utils;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod model;
pub mod paths;
pub mod storage;

pub use error::{Error, Result};
