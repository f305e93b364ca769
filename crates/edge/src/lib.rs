// crates/edge/src/lib.rs

pub mod client;
pub mod settings;

mod error;

pub use client::HttpSearchClient;
pub use error::{Error, Result};
pub use settings::SearchSettings;
