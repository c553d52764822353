//! Catalog domain, persistence and change relay.

pub mod context;
pub mod database;
pub mod domain;
pub mod relay;
pub mod seed;

#[cfg(test)]
mod test;
