//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for rendering the planner prompt
#[derive(Debug, Clone, Serialize)]
pub struct PlannerContext {
    /// The user's current request
    pub query: String,
    /// Prior conversation messages, oldest first
    pub history: Vec<String>,
    /// Summary of the most recent plan, when one exists
    pub last_plan_summary: Option<String>,
}

impl PlannerContext {
    /// Context for the first request of a conversation
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            history: Vec::new(),
            last_plan_summary: None,
        }
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    pub fn with_last_plan_summary(mut self, summary: Option<String>) -> Self {
        self.last_plan_summary = summary;
        self
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.travelgpt/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// Checks `.travelgpt/prompts/` for user overrides and `prompts/` for
    /// repo defaults under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        debug!(?root, "PromptLoader::new: called");
        let user_dir = root.join(".travelgpt/prompts");
        let repo_dir = root.join("prompts");

        Self {
            hbs: Handlebars::new(),
            user_dir: user_dir.exists().then_some(user_dir),
            repo_dir: repo_dir.exists().then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Handlebars::new(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.travelgpt/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render the planner system prompt with the given context
    pub fn planner_prompt(&self, context: &PlannerContext) -> Result<String> {
        debug!(
            query_len = context.query.len(),
            history_len = context.history.len(),
            "PromptLoader::planner_prompt: called"
        );
        let template = self.load_template("planner")?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render planner template: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_prompt_embeds_query() {
        let loader = PromptLoader::embedded_only();
        let ctx = PlannerContext::new("5 days in Tokyo");

        let prompt = loader.planner_prompt(&ctx).unwrap();
        assert!(prompt.contains("5 days in Tokyo"));
        assert!(prompt.contains("single JSON object"));
        assert!(!prompt.contains("Previous messages:"));
        assert!(!prompt.contains("Last plan summary:"));
    }

    #[test]
    fn test_planner_prompt_renders_history_and_summary() {
        let loader = PromptLoader::embedded_only();
        let ctx = PlannerContext::new("make day 2 cheaper")
            .with_history(vec!["5 days in Tokyo".to_string(), "Here is a plan...".to_string()])
            .with_last_plan_summary(Some("Tokyo, 5 days, museums".to_string()));

        let prompt = loader.planner_prompt(&ctx).unwrap();
        assert!(prompt.contains("Previous messages:"));
        assert!(prompt.contains("5 days in Tokyo"));
        assert!(prompt.contains("Last plan summary:"));
        assert!(prompt.contains("Tokyo, 5 days, museums"));
    }

    #[test]
    fn test_loader_prefers_disk_over_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let prompts = dir.path().join("prompts");
        std::fs::create_dir_all(&prompts).unwrap();
        std::fs::write(prompts.join("planner.pmt"), "override: {{query}}").unwrap();

        let loader = PromptLoader::new(dir.path());
        let prompt = loader.planner_prompt(&PlannerContext::new("test")).unwrap();
        assert_eq!(prompt, "override: test");
    }

    #[test]
    fn test_loader_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
