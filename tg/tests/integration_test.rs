//! Integration tests for TravelGPT
//!
//! These tests verify end-to-end behavior: planner reply to stored plan,
//! stored plan to rendered views, and the Excel export.

use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use planstore::PlanStore;
use schedcore::{CalendarLayout, Cell, ExcelExporter, parse_schedule, sample_schedule};
use travelgpt::agent::TravelAgent;
use travelgpt::chat::{ChatSession, SEED_USER_ID, latest_plan_activities};
use travelgpt::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use travelgpt::prompts::PromptLoader;
use travelgpt::render;

/// LLM stub that always returns the same canned reply.
struct FixedReplyClient {
    reply: String,
}

#[async_trait]
impl LlmClient for FixedReplyClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Ok(CompletionResponse {
            content: self.reply.clone(),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }
}

fn planner_reply() -> String {
    serde_json::json!({
        "conversation": "Lisbon is lovely in June; here is a starting point.",
        "travelDetails": {
            "destination": "Lisbon",
            "startDate": "2025-06-01",
            "endDate": "2025-06-03",
            "days": 3
        },
        "plan": [
            {
                "initialDatetime": "2025-06-01T15:00:00Z",
                "finalDatetime": "2025-06-03T11:00:00Z",
                "city": "Lisbon",
                "activityName": "Hotel stay",
                "activityType": "Stay",
                "providerCompany": "Hotel Tejo",
                "purchased": false
            },
            {
                "initialDatetime": "2025-06-02T10:00:00Z",
                "finalDatetime": "2025-06-02T12:00:00Z",
                "city": "Lisbon",
                "activityName": "Castelo de Sao Jorge",
                "activityType": "Attraction",
                "price": 15.0,
                "purchased": false
            }
        ]
    })
    .to_string()
}

fn session_at(db_path: &std::path::Path) -> ChatSession {
    let store = PlanStore::open(db_path).expect("Failed to open store");
    let llm: Arc<dyn LlmClient> = Arc::new(FixedReplyClient {
        reply: planner_reply(),
    });
    let agent = TravelAgent::new(llm, PromptLoader::embedded_only());
    ChatSession::new(store, agent)
}

// =============================================================================
// Chat pipeline
// =============================================================================

#[tokio::test]
async fn test_send_round_trip_through_store() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("travelgpt.db");

    {
        let mut session = session_at(&db_path);
        let reply = session.send("3 days in Lisbon in June").await.expect("send failed");
        assert_eq!(reply.travel_details.destination, "Lisbon");
        assert_eq!(reply.plan.len(), 2);
    }

    // Reopen the database fresh and verify everything survived
    let store = PlanStore::open(&db_path).expect("Failed to reopen store");

    let messages = store.messages_for_user(SEED_USER_ID).expect("messages query failed");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message, "3 days in Lisbon in June");
    assert!(messages[1].message.contains("Lisbon is lovely"));

    let activities = latest_plan_activities(&store).expect("activities query failed");
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[0].activity_name, "Hotel stay");
    assert_eq!(activities[1].price, Some(15.0));
}

#[tokio::test]
async fn test_repeated_sends_version_plans() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("travelgpt.db");

    let mut session = session_at(&db_path);
    session.send("3 days in Lisbon").await.expect("first send failed");
    session.send("add a castle visit").await.expect("second send failed");
    drop(session);

    let store = PlanStore::open(&db_path).expect("Failed to reopen store");
    let plan = store
        .latest_plan(SEED_USER_ID)
        .expect("latest_plan query failed")
        .expect("no plan stored");
    assert_eq!(plan.version_number, 2);
    assert!(plan.summary_of_plan.contains("Lisbon"));
}

// =============================================================================
// Layout and rendering stay in lock step
// =============================================================================

#[test]
fn test_layout_drives_both_views() {
    let activities = parse_schedule(&planner_reply_plan_json()).expect("parse failed");
    let layout = CalendarLayout::compute(&activities);

    // Three-day covering range, one stay row
    assert_eq!(layout.days().len(), 3);
    assert_eq!(layout.stay_rows(), 1);

    // The attraction spans 10:00-12:00 on day 2
    assert!(matches!(layout.cell(1, 10), Cell::Start { rows: 3, .. }));
    assert_eq!(layout.cell(1, 11), Cell::Covered);

    // The terminal calendar paints the same structure
    let rendered = render::render_calendar(&activities, false);
    assert!(rendered.contains("Castelo de Sao Jorge"));
    assert!(rendered.contains("Lisbon, Hotel Tejo"));
}

fn planner_reply_plan_json() -> String {
    let reply: serde_json::Value = serde_json::from_str(&planner_reply()).unwrap();
    reply["plan"].to_string()
}

// =============================================================================
// Excel export
// =============================================================================

#[test]
fn test_export_produces_xlsx() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("out.xlsx");

    let activities = parse_schedule(&planner_reply_plan_json()).expect("parse failed");
    ExcelExporter::to_file(&activities, &path).expect("export failed");

    let bytes = std::fs::read(&path).expect("read failed");
    assert!(bytes.starts_with(b"PK"), "xlsx should be a zip container");
}

#[test]
fn test_sample_schedule_exports() {
    let activities = sample_schedule();
    let bytes = ExcelExporter::to_buffer(&activities).expect("export failed");
    assert!(bytes.starts_with(b"PK"));
}
