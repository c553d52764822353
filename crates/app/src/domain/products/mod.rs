//! Products

pub mod allocator;
pub mod data;
pub mod errors;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

pub use errors::ProductsServiceError;
pub use service::*;
