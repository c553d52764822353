//! Catalog client: request state, notifications, REST access and live
//! updates over the push channel.

pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod notification;
pub mod push;
pub mod state;
