//! Relay Config

use clap::{ArgAction, Args};

/// Push channel settings.
#[derive(Debug, Args)]
pub struct RelayConfig {
    /// Events buffered per push session before the oldest are dropped
    #[arg(
        long,
        env = "RELAY_CAPACITY",
        default_value_t = 256,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub relay_capacity: u32,

    /// Publish `product-updated` after each successful REST mutation
    #[arg(
        long,
        env = "ANNOUNCE_MUTATIONS",
        default_value_t = false,
        action = ArgAction::Set
    )]
    pub announce_mutations: bool,
}
