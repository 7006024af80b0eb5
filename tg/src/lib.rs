//! TravelGPT - conversational travel planner
//!
//! Application crate wiring the pure scheduling core ([`schedcore`]) and
//! the SQLite store ([`planstore`]) into a chat-driven CLI. The agent
//! turns free-form travel requests into validated activity schedules,
//! which render as a list or hourly calendar and export to Excel.

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod render;
