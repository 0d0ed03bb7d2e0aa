mod client;
mod models;
mod search_error;

pub use client::{SearchProvider, SerperClient};
pub use search_error::SearchError;
