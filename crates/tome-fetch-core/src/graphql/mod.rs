//! GraphQL transport for the settings backend

mod client;
pub mod operations;

pub use client::GraphQlClient;
