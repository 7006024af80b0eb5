//! Travel planning agent
//!
//! Orchestrates one planning round: renders the planner prompt with the
//! conversation context, calls the LLM, and validates the reply envelope.
//! The `plan` array inside the envelope goes through the strict schedule
//! parser, so a malformed itinerary is rejected here rather than surfacing
//! as a broken calendar later.

use std::sync::Arc;

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::debug;

use schedcore::{Activity, parse_schedule};

use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::{PlannerContext, PromptLoader};

/// Token budget for one planning reply
const REPLY_MAX_TOKENS: u32 = 8192;

/// Extracted trip parameters, echoed back by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelDetails {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub days: u32,
}

/// One validated planning reply
#[derive(Debug, Clone)]
pub struct AgentReply {
    /// Conversational text for the user
    pub conversation: String,
    /// Trip parameters the planner extracted
    pub travel_details: TravelDetails,
    /// The proposed schedule, already validated
    pub plan: Vec<Activity>,
}

/// Raw reply envelope as the model emits it
///
/// `plan` stays untyped here; the schedule parser owns its validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReplyEnvelope {
    conversation: String,
    travel_details: TravelDetails,
    plan: serde_json::Value,
}

/// The planning agent
pub struct TravelAgent {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
}

impl TravelAgent {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        Self { llm, prompts }
    }

    /// Run one planning round for the given conversation context.
    pub async fn plan(&self, context: &PlannerContext) -> Result<AgentReply> {
        debug!(query_len = context.query.len(), "plan: called");

        let system_prompt = self.prompts.planner_prompt(context)?;

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(context.query.clone())],
            max_tokens: REPLY_MAX_TOKENS,
        };

        let response = self.llm.complete(request).await?;
        debug!(
            content_len = response.content.len(),
            stop_reason = ?response.stop_reason,
            "plan: got response"
        );

        Self::parse_reply(&response.content)
    }

    /// Validate a raw model reply into an [`AgentReply`].
    fn parse_reply(raw: &str) -> Result<AgentReply> {
        let body = strip_code_fences(raw);

        let envelope: ReplyEnvelope =
            serde_json::from_str(body).context("Planner reply was not the expected JSON envelope")?;

        if envelope.conversation.is_empty() {
            return Err(eyre!("Planner reply had an empty conversation field"));
        }

        let plan = parse_schedule(&envelope.plan.to_string()).context("Planner reply contained an invalid schedule")?;

        Ok(AgentReply {
            conversation: envelope.conversation,
            travel_details: envelope.travel_details,
            plan,
        })
    }
}

/// Strip a Markdown code fence wrapper, if present.
///
/// Models sometimes wrap the JSON envelope in ```json fences despite the
/// prompt asking for bare JSON.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening fence line
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => return trimmed,
    };

    body.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}
