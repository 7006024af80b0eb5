//! PlanStore - SQLite persistence for travel-planning conversations
//!
//! Stores the chat history and every plan version the agent proposes,
//! keyed to a single seed user. Activities round-trip through the store
//! unchanged (modulo planner passthrough fields, which are conversation
//! artifacts and not persisted).
//!
//! # Schema
//!
//! ```text
//! users       user_id PK, name, summary, preferences
//! messages    id PK, time, user_id, plan_id?, message, message_type, sender
//! plans       id PK, user_id, time_creation, version_number,
//!             message_id_created, context, summary_of_plan
//! activities  id PK, plan_id, <activity columns>, extra_fields (JSON)
//! ```

pub mod models;
mod store;

pub use models::{ChatMessage, MessageKind, PlanRecord, Sender, User};
pub use store::{PlanStore, StoreError};
