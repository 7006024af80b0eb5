//! Chat session orchestration and the interactive REPL
//!
//! A [`ChatSession`] owns the store and the agent and runs the full
//! send pipeline: persist the incoming message, assemble context from the
//! conversation so far, ask the agent for a plan, then persist the reply
//! and the new plan version in one pass.

use std::path::Path;

use chrono::Utc;
use colored::Colorize;
use eyre::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};
use uuid::Uuid;

use planstore::{ChatMessage, MessageKind, PlanRecord, PlanStore, Sender, User};
use schedcore::{Activity, EXPORT_FILENAME, ExcelExporter};

use crate::agent::{AgentReply, TravelAgent};
use crate::prompts::PlannerContext;
use crate::render;

/// The single seeded chat user.
pub const SEED_USER_ID: &str = "omar-unique-id";

fn seed_user() -> User {
    User {
        user_id: SEED_USER_ID.to_string(),
        name: "Omar".to_string(),
        summary: "Seed user Omar".to_string(),
        preferences: "{}".to_string(),
    }
}

/// One conversation with the planner, backed by the store.
pub struct ChatSession {
    store: PlanStore,
    agent: TravelAgent,
}

impl ChatSession {
    pub fn new(store: PlanStore, agent: TravelAgent) -> Self {
        Self { store, agent }
    }

    /// Run the full send pipeline for one user query.
    pub async fn send(&mut self, query: &str) -> Result<AgentReply> {
        debug!(query_len = query.len(), "send: called");

        self.store.upsert_user(&seed_user())?;

        self.store.insert_message(&ChatMessage {
            id: Uuid::now_v7().to_string(),
            time: Utc::now(),
            user_id: SEED_USER_ID.to_string(),
            plan_id: None,
            message: query.to_string(),
            kind: MessageKind::Incoming,
            sender: Sender::User,
        })?;

        // Context: every prior message plus the latest plan's summary
        let history: Vec<String> = self
            .store
            .messages_for_user(SEED_USER_ID)?
            .into_iter()
            .map(|m| m.message)
            .collect();
        let last_plan = self.store.latest_plan(SEED_USER_ID)?;

        let context = PlannerContext::new(query)
            .with_history(history)
            .with_last_plan_summary(last_plan.as_ref().map(|plan| plan.summary_of_plan.clone()));

        let reply = self.agent.plan(&context).await?;

        let outgoing_id = Uuid::now_v7().to_string();
        self.store.insert_message(&ChatMessage {
            id: outgoing_id.clone(),
            time: Utc::now(),
            user_id: SEED_USER_ID.to_string(),
            plan_id: None,
            message: reply.conversation.clone(),
            kind: MessageKind::Outgoing,
            sender: Sender::Agent,
        })?;

        let version = self.store.next_plan_version(SEED_USER_ID)?;
        let record = PlanRecord {
            id: Uuid::now_v7().to_string(),
            user_id: SEED_USER_ID.to_string(),
            time_creation: Utc::now(),
            version_number: version,
            message_id_created: outgoing_id,
            context: serde_json::to_string(&reply.travel_details)
                .context("Failed to serialize travel details")?,
            summary_of_plan: summarize(&reply),
        };
        self.store.create_plan(&record, &reply.plan)?;
        info!(version, activities = reply.plan.len(), "send: plan stored");

        Ok(reply)
    }

    /// Activities of the most recent plan version, or empty when no plan
    /// has been proposed yet.
    pub fn latest_activities(&self) -> Result<Vec<Activity>> {
        latest_plan_activities(&self.store)
    }
}

/// Activities of the seed user's most recent plan version.
///
/// Used directly by the read-only `show` and `export` commands, which open
/// the store without constructing an agent.
pub fn latest_plan_activities(store: &PlanStore) -> Result<Vec<Activity>> {
    match store.latest_plan(SEED_USER_ID)? {
        Some(plan) => Ok(store.activities_for_plan(&plan.id)?),
        None => Ok(Vec::new()),
    }
}

/// One-line summary of a plan, fed back as context on later rounds.
fn summarize(reply: &AgentReply) -> String {
    let details = &reply.travel_details;
    format!(
        "{}, {} to {}, {} activities",
        details.destination,
        details.start_date,
        details.end_date,
        reply.plan.len()
    )
}

/// Run the interactive chat loop.
pub async fn run_repl(session: &mut ChatSession) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("{}", "TravelGPT - conversational travel planner".bold());
    println!("Describe a trip to get started. /help for commands.\n");

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);

                match line {
                    "/quit" | "/exit" => break,
                    "/help" => print_help(),
                    "/list" => println!("{}", render::render_list(&session.latest_activities()?, true)),
                    "/calendar" => println!("{}", render::render_calendar(&session.latest_activities()?, true)),
                    "/export" => export_latest(session, Path::new(EXPORT_FILENAME))?,
                    _ => match session.send(line).await {
                        Ok(reply) => {
                            println!("\n{}\n", reply.conversation.green());
                            println!("{}", render::render_list(&reply.plan, true));
                        }
                        Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
                    },
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn export_latest(session: &ChatSession, path: &Path) -> Result<()> {
    let activities = session.latest_activities()?;
    if activities.is_empty() {
        println!("No plan to export yet.");
        return Ok(());
    }
    ExcelExporter::to_file(&activities, path)?;
    println!("Exported {} activities to {}", activities.len(), path.display());
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("  /list      show the latest plan as a list");
    println!("  /calendar  show the latest plan as a calendar");
    println!("  /export    write the latest plan to {EXPORT_FILENAME}");
    println!("  /quit      leave the chat");
    println!("Anything else is sent to the travel agent.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, LlmClient, StopReason, TokenUsage};
    use crate::prompts::PromptLoader;

    fn envelope(destination: &str, conversation: &str) -> String {
        serde_json::json!({
            "conversation": conversation,
            "travelDetails": {
                "destination": destination,
                "startDate": "2025-06-01",
                "endDate": "2025-06-02",
                "days": 2
            },
            "plan": [{
                "initialDatetime": "2025-06-01T15:00:00Z",
                "finalDatetime": "2025-06-02T11:00:00Z",
                "city": destination,
                "activityName": "Hotel stay",
                "activityType": "Stay",
                "purchased": false
            }]
        })
        .to_string()
    }

    fn session_with_replies(replies: Vec<String>) -> ChatSession {
        let responses = replies
            .into_iter()
            .map(|text| CompletionResponse {
                content: text,
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
            .collect();
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlmClient::new(responses));
        let agent = TravelAgent::new(llm, PromptLoader::embedded_only());
        let store = PlanStore::open_in_memory().unwrap();
        ChatSession::new(store, agent)
    }

    #[tokio::test]
    async fn test_send_persists_plan() {
        let mut session = session_with_replies(vec![envelope("Lisbon", "Here you go")]);

        let reply = session.send("2 days in Lisbon").await.unwrap();
        assert_eq!(reply.conversation, "Here you go");

        let activities = session.latest_activities().unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].city, "Lisbon");
    }

    #[tokio::test]
    async fn test_send_increments_plan_version() {
        let mut session = session_with_replies(vec![
            envelope("Lisbon", "First pass"),
            envelope("Lisbon", "Refined"),
        ]);

        session.send("2 days in Lisbon").await.unwrap();
        session.send("add a dinner").await.unwrap();

        let plan = session.store.latest_plan(SEED_USER_ID).unwrap().unwrap();
        assert_eq!(plan.version_number, 2);
        assert!(plan.summary_of_plan.contains("Lisbon"));
        assert!(plan.context.contains("Lisbon"));
    }

    #[tokio::test]
    async fn test_failed_round_keeps_incoming_message() {
        let mut session = session_with_replies(vec!["not json at all".to_string()]);

        assert!(session.send("2 days in Lisbon").await.is_err());

        // The incoming message was persisted before the agent failed
        let messages = session.store.messages_for_user(SEED_USER_ID).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageKind::Incoming);

        // No plan was created
        assert!(session.store.latest_plan(SEED_USER_ID).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_activities_empty_without_plan() {
        let session = session_with_replies(vec![]);
        assert!(session.latest_activities().unwrap().is_empty());
    }
}
