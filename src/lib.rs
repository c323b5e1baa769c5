// Varta: follower audit for Twitch channels.
//
// This is the library root. Each module corresponds to a stage of the
// audit pipeline: token capture, follower fetching, followed-channel
// resolution, classification, and per-follower aggregation.

pub mod audit;
pub mod auth;
pub mod classify;
pub mod config;
pub mod error;
pub mod follows;
pub mod output;
pub mod twitch;
