//! Team identity resolution and cross-season progression tracking.
//!
//! Youth-soccer team names drift from season to season (a sponsor color is
//! appended, the club rebrands, the roster ages up a division). This crate
//! resolves raw team-name strings against a durable `Team` identity using an
//! ordered chain of deterministic and probabilistic match strategies, and
//! reconstructs each team's chronological progression across age groups.

pub mod age_group;
pub mod assets;
pub mod config;
pub mod database;
pub mod errors;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod parser;
pub mod progression;
pub mod repositories;
pub mod resolver;
