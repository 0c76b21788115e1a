//! Command-line front end over `igpsport_client`: listing, JSON dumps,
//! statistics and batch FIT downloads.

pub mod cli;
pub mod commands;
pub mod dump;
pub mod stats;
