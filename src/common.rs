pub mod deep_links;
pub mod error;
pub mod formatters;
