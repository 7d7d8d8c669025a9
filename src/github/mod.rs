pub mod client;
pub mod models;
pub mod pagination;

pub use client::GitHubClient;
pub use pagination::parse_link_header;
