//! SeaORM entities for the subscriber tables

pub mod action_volumes;
pub mod actions;
pub mod assets;
pub mod blocks;
pub mod daily_health_summaries;
pub mod genesis_data;
pub mod health_events;
pub mod prelude;
pub mod transactions;
pub mod validator_stake;
