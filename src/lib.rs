//! Mood Stylist: turns a mood and style selection into outfit ideas with
//! illustrative images generated through an AI gateway.

pub mod client;
pub mod config;
pub mod errors;
pub mod extract;
pub mod gateway;
pub mod models;
pub mod orchestrator;
pub mod routes;
pub mod wizard;
