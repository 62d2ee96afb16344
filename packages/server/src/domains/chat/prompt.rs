//! System prompt for the interview-coach persona.
//!
//! The template is plain text split into sections by `[name]` header lines:
//! `[persona]`, `[resume_context]` (uses `{resume_id}`) and
//! `[training_context]` (uses `{training_type}`). Text before the first
//! header counts as persona.

use anyhow::{Context, Result};

const BUNDLED: &str = include_str!("../../../prompts/interview_coach.txt");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptTemplate {
    persona: String,
    resume_context: String,
    training_context: String,
}

impl PromptTemplate {
    /// The template shipped with the crate
    pub fn bundled() -> Self {
        Self::parse(BUNDLED)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read prompt template {}", path))?;
        Ok(Self::parse(&raw))
    }

    /// `CHAT_PROMPT_PATH` when configured, otherwise the bundled template
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::bundled()),
        }
    }

    pub fn parse(raw: &str) -> Self {
        let mut template = Self::default();
        let mut current = &mut template.persona;

        for line in raw.lines() {
            match line.trim() {
                "[persona]" => current = &mut template.persona,
                "[resume_context]" => current = &mut template.resume_context,
                "[training_context]" => current = &mut template.training_context,
                _ => {
                    current.push_str(line);
                    current.push('\n');
                }
            }
        }

        template.persona = template.persona.trim().to_string();
        template.resume_context = template.resume_context.trim().to_string();
        template.training_context = template.training_context.trim().to_string();
        template
    }

    /// Render the system prompt, adding a context paragraph for each
    /// non-empty identifier.
    pub fn build(&self, resume_id: Option<&str>, training_type: Option<&str>) -> String {
        let mut prompt = self.persona.clone();

        if let Some(id) = resume_id.filter(|v| !v.is_empty()) {
            if !self.resume_context.is_empty() {
                prompt.push_str("\n\n");
                prompt.push_str(&self.resume_context.replace("{resume_id}", id));
            }
        }
        if let Some(kind) = training_type.filter(|v| !v.is_empty()) {
            if !self.training_context.is_empty() {
                prompt.push_str("\n\n");
                prompt.push_str(&self.training_context.replace("{training_type}", kind));
            }
        }
        prompt
    }
}
