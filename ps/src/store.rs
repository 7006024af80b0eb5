//! SQLite plan store
//!
//! Single-connection store for users, messages, plans, and plan
//! activities. Schema is versioned through the `user_version` pragma;
//! datetimes are stored as RFC 3339 text, open mappings as JSON text.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use schedcore::{Activity, ActivityType};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{ChatMessage, MessageKind, PlanRecord, Sender, User};

const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Failure inside the plan store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid JSON in column {column}: {source}")]
    Json {
        column: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid value in column {column}: {value}")]
    Corrupt { column: &'static str, value: String },

    #[error("database schema version {found} is newer than supported {supported}")]
    SchemaTooNew { found: i32, supported: i32 },
}

/// The plan store. One connection, no pooling - callers are single-task.
pub struct PlanStore {
    conn: Connection,
}

impl PlanStore {
    /// Open or create a store at the given path and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "PlanStore::open: called");
        let mut conn = Connection::open(path)?;
        run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut conn = Connection::open_in_memory()?;
        run_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Insert or refresh a user row. Existing name/summary/preferences are
    /// kept; the original seeds the user on every request.
    pub fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        debug!(user_id = %user.user_id, "PlanStore::upsert_user: called");
        self.conn.execute(
            "INSERT INTO users (user_id, name, summary, preferences)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO NOTHING",
            params![user.user_id, user.name, user.summary, user.preferences],
        )?;
        Ok(())
    }

    pub fn insert_message(&self, message: &ChatMessage) -> Result<(), StoreError> {
        debug!(id = %message.id, kind = message.kind.as_str(), "PlanStore::insert_message: called");
        self.conn.execute(
            "INSERT INTO messages (id, time, user_id, plan_id, message, message_type, sender)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                message.id,
                to_rfc3339(message.time),
                message.user_id,
                message.plan_id,
                message.message,
                message.kind.as_str(),
                message.sender.as_str(),
            ],
        )?;
        Ok(())
    }

    /// All messages for a user, oldest first.
    pub fn messages_for_user(&self, user_id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, time, user_id, plan_id, message, message_type, sender
             FROM messages WHERE user_id = ?1 ORDER BY time ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![user_id], row_to_message)?;
        let mut messages = Vec::new();
        for row in rows {
            messages.push(row??);
        }
        Ok(messages)
    }

    /// Insert a plan and its ordered activities in one transaction.
    pub fn create_plan(
        &mut self,
        plan: &PlanRecord,
        activities: &[Activity],
    ) -> Result<(), StoreError> {
        debug!(plan_id = %plan.id, activities = activities.len(), "PlanStore::create_plan: called");
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO plans (id, user_id, time_creation, version_number,
                                message_id_created, context, summary_of_plan)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                plan.id,
                plan.user_id,
                to_rfc3339(plan.time_creation),
                plan.version_number,
                plan.message_id_created,
                plan.context,
                plan.summary_of_plan,
            ],
        )?;

        for activity in activities {
            let extra_fields = match &activity.extra_fields {
                Some(fields) => Some(serde_json::to_string(fields).map_err(|source| {
                    StoreError::Json {
                        column: "extra_fields",
                        source,
                    }
                })?),
                None => None,
            };

            tx.execute(
                "INSERT INTO activities (id, plan_id, initial_datetime, final_datetime,
                                         city, activity_name, activity_type, price,
                                         provider_company, extra_details, extra_fields,
                                         link_to_buy, purchased)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    Uuid::now_v7().to_string(),
                    plan.id,
                    to_rfc3339(activity.initial_datetime),
                    to_rfc3339(activity.final_datetime),
                    activity.city,
                    activity.activity_name,
                    activity.activity_type.name(),
                    activity.price,
                    activity.provider_company,
                    activity.extra_details,
                    extra_fields,
                    activity.link_to_buy,
                    activity.purchased,
                ],
            )?;
        }

        tx.commit()?;
        info!(plan_id = %plan.id, "PlanStore::create_plan: committed");
        Ok(())
    }

    /// Most recent plan for a user, by creation time.
    pub fn latest_plan(&self, user_id: &str) -> Result<Option<PlanRecord>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, user_id, time_creation, version_number,
                        message_id_created, context, summary_of_plan
                 FROM plans WHERE user_id = ?1
                 ORDER BY time_creation DESC, rowid DESC LIMIT 1",
                params![user_id],
                row_to_plan,
            )
            .optional()?
            .transpose()
    }

    pub fn plan(&self, plan_id: &str) -> Result<Option<PlanRecord>, StoreError> {
        self.conn
            .query_row(
                "SELECT id, user_id, time_creation, version_number,
                        message_id_created, context, summary_of_plan
                 FROM plans WHERE id = ?1",
                params![plan_id],
                row_to_plan,
            )
            .optional()?
            .transpose()
    }

    /// Activities of a plan in their original insertion order.
    pub fn activities_for_plan(&self, plan_id: &str) -> Result<Vec<Activity>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT initial_datetime, final_datetime, city, activity_name,
                    activity_type, price, provider_company, extra_details,
                    extra_fields, link_to_buy, purchased
             FROM activities WHERE plan_id = ?1 ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map(params![plan_id], row_to_activity)?;
        let mut activities = Vec::new();
        for row in rows {
            activities.push(row??);
        }
        Ok(activities)
    }

    /// Next plan version number for a user (1-based).
    pub fn next_plan_version(&self, user_id: &str) -> Result<i64, StoreError> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(version_number) FROM plans WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0) + 1)
    }
}

fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_rfc3339(column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt {
            column,
            value: value.to_string(),
        })
}

type RowResult<T> = rusqlite::Result<Result<T, StoreError>>;

fn row_to_message(row: &Row) -> RowResult<ChatMessage> {
    let time: String = row.get("time")?;
    let kind: String = row.get("message_type")?;
    let sender: String = row.get("sender")?;
    let id: String = row.get("id")?;
    let user_id: String = row.get("user_id")?;
    let plan_id: Option<String> = row.get("plan_id")?;
    let message: String = row.get("message")?;

    Ok((|| {
        Ok(ChatMessage {
            id,
            time: parse_rfc3339("time", &time)?,
            user_id,
            plan_id,
            message,
            kind: MessageKind::from_str(&kind).ok_or(StoreError::Corrupt {
                column: "message_type",
                value: kind.clone(),
            })?,
            sender: Sender::from_str(&sender).ok_or(StoreError::Corrupt {
                column: "sender",
                value: sender.clone(),
            })?,
        })
    })())
}

fn row_to_plan(row: &Row) -> RowResult<PlanRecord> {
    let time_creation: String = row.get("time_creation")?;
    let id: String = row.get("id")?;
    let user_id: String = row.get("user_id")?;
    let version_number: i64 = row.get("version_number")?;
    let message_id_created: String = row.get("message_id_created")?;
    let context: String = row.get("context")?;
    let summary_of_plan: String = row.get("summary_of_plan")?;

    Ok(parse_rfc3339("time_creation", &time_creation).map(|time_creation| PlanRecord {
        id,
        user_id,
        time_creation,
        version_number,
        message_id_created,
        context,
        summary_of_plan,
    }))
}

fn row_to_activity(row: &Row) -> RowResult<Activity> {
    let initial: String = row.get("initial_datetime")?;
    let end: String = row.get("final_datetime")?;
    let ty: String = row.get("activity_type")?;
    let extra_fields: Option<String> = row.get("extra_fields")?;
    let city: String = row.get("city")?;
    let activity_name: String = row.get("activity_name")?;
    let price: Option<f64> = row.get("price")?;
    let provider_company: Option<String> = row.get("provider_company")?;
    let extra_details: Option<String> = row.get("extra_details")?;
    let link_to_buy: Option<String> = row.get("link_to_buy")?;
    let purchased: bool = row.get("purchased")?;

    Ok((|| {
        let activity_type: ActivityType = serde_json::from_value(serde_json::Value::String(
            ty.clone(),
        ))
        .map_err(|_| StoreError::Corrupt {
            column: "activity_type",
            value: ty.clone(),
        })?;

        let extra_fields: Option<BTreeMap<String, serde_json::Value>> = match extra_fields {
            Some(raw) => Some(serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                column: "extra_fields",
                source,
            })?),
            None => None,
        };

        Ok(Activity {
            initial_datetime: parse_rfc3339("initial_datetime", &initial)?,
            final_datetime: parse_rfc3339("final_datetime", &end)?,
            city,
            activity_name,
            activity_type,
            price,
            provider_company,
            extra_details,
            extra_fields,
            link_to_buy,
            purchased,
            passthrough: BTreeMap::new(),
        })
    })())
}

fn run_migrations(conn: &mut Connection) -> Result<(), StoreError> {
    let mut version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::SchemaTooNew {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }
    if version == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    while version < CURRENT_SCHEMA_VERSION {
        version += 1;
        apply_migration(&tx, version)?;
        debug!(version, "run_migrations: applied");
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    tx.commit()?;
    info!(version = CURRENT_SCHEMA_VERSION, "run_migrations: schema current");
    Ok(())
}

fn apply_migration(tx: &rusqlite::Transaction, version: i32) -> Result<(), StoreError> {
    match version {
        1 => {
            tx.execute_batch(
                "CREATE TABLE users (
                     user_id     TEXT PRIMARY KEY,
                     name        TEXT NOT NULL,
                     summary     TEXT NOT NULL DEFAULT '',
                     preferences TEXT NOT NULL DEFAULT '{}'
                 );
                 CREATE TABLE messages (
                     id           TEXT PRIMARY KEY,
                     time         TEXT NOT NULL,
                     user_id      TEXT NOT NULL REFERENCES users(user_id),
                     plan_id      TEXT,
                     message      TEXT NOT NULL,
                     message_type TEXT NOT NULL,
                     sender       TEXT NOT NULL
                 );
                 CREATE TABLE plans (
                     id                 TEXT PRIMARY KEY,
                     user_id            TEXT NOT NULL REFERENCES users(user_id),
                     time_creation      TEXT NOT NULL,
                     version_number     INTEGER NOT NULL,
                     message_id_created TEXT NOT NULL,
                     context            TEXT NOT NULL DEFAULT '{}',
                     summary_of_plan    TEXT NOT NULL DEFAULT ''
                 );
                 CREATE TABLE activities (
                     id               TEXT PRIMARY KEY,
                     plan_id          TEXT NOT NULL REFERENCES plans(id),
                     initial_datetime TEXT NOT NULL,
                     final_datetime   TEXT NOT NULL,
                     city             TEXT NOT NULL,
                     activity_name    TEXT NOT NULL,
                     activity_type    TEXT NOT NULL,
                     price            REAL,
                     provider_company TEXT,
                     extra_details    TEXT,
                     extra_fields     TEXT,
                     link_to_buy      TEXT,
                     purchased        INTEGER NOT NULL DEFAULT 0
                 );
                 CREATE INDEX idx_messages_user_time ON messages(user_id, time);
                 CREATE INDEX idx_plans_user_time ON plans(user_id, time_creation);
                 CREATE INDEX idx_activities_plan ON activities(plan_id);",
            )?;
        }
        other => {
            return Err(StoreError::Corrupt {
                column: "user_version",
                value: other.to_string(),
            });
        }
    }
    Ok(())
}
