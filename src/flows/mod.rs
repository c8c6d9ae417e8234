//! Prompt flows: single-shot, schema-validated calls to a hosted language model.
//!
//! A [`PromptFlow`] pairs a prompt template with typed input and output
//! contracts. Running a flow validates the input and renders the template.
//! It then makes exactly one [`ModelBackend`] round trip and validates the
//! reply against the output type. There is no retry and no fallback value.

use std::marker::PhantomData;
use std::time::Instant;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationError};

pub mod news;
pub mod scam;
pub mod translate;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Model request failed: {0}")]
    Remote(String),
    #[error("Model reply does not match the output schema: {0}")]
    Schema(String),
    #[error("Missing API key")]
    MissingApiKey,
}

/// A rendered prompt, ready for one model round trip.
#[derive(Debug, Clone)]
pub struct FlowPrompt {
    pub flow: &'static str,
    pub system: String,
    pub user: String,
}

/// The remote side of a flow. Implementations perform a single request and
/// return the raw text of the model's reply.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate(&self, prompt: FlowPrompt) -> Result<String, FlowError>;

    fn model_name(&self) -> &str;
}

pub struct PromptFlow<I, O> {
    pub name: &'static str,
    template: &'static str,
    output_schema: &'static str,
    _contract: PhantomData<fn(I) -> O>,
}

impl<I, O> PromptFlow<I, O> {
    pub const fn new(name: &'static str, template: &'static str, output_schema: &'static str) -> Self {
        Self {
            name,
            template,
            output_schema,
            _contract: PhantomData,
        }
    }

    pub fn system_prompt(&self) -> String {
        format!(
            "Respond with a single JSON object and nothing else. The object must have exactly this shape:\n{}",
            self.output_schema
        )
    }
}

impl<I, O> PromptFlow<I, O>
where
    I: Serialize + Validate,
    O: DeserializeOwned + Validate,
{
    pub fn render(&self, input: &I) -> Result<String, FlowError> {
        let fields = match serde_json::to_value(input) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(FlowError::InvalidInput("flow input must be an object".to_string())),
            Err(e) => return Err(FlowError::InvalidInput(e.to_string())),
        };

        render_template(self.template, &fields)
    }

    pub async fn run(&self, backend: &dyn ModelBackend, input: &I) -> Result<O, FlowError> {
        input
            .validate()
            .map_err(|e| FlowError::InvalidInput(e.to_string()))?;

        let prompt = FlowPrompt {
            flow: self.name,
            system: self.system_prompt(),
            user: self.render(input)?,
        };

        let started = Instant::now();
        let reply = backend.generate(prompt).await.map_err(|e| {
            warn!(flow = self.name, model = backend.model_name(), error = %e, "flow request failed");
            e
        })?;

        let output = parse_output::<O>(&reply).map_err(|e| {
            warn!(flow = self.name, model = backend.model_name(), error = %e, "flow reply rejected");
            e
        })?;

        info!(
            flow = self.name,
            model = backend.model_name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "flow completed"
        );

        Ok(output)
    }
}

/// Substitutes every `{{{field}}}` placeholder with the matching input field.
fn render_template(template: &str, fields: &Map<String, Value>) -> Result<String, FlowError> {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{{") {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let end = after
            .find("}}}")
            .ok_or_else(|| FlowError::InvalidInput("unterminated placeholder in prompt template".to_string()))?;

        let key = after[..end].trim();
        match fields.get(key) {
            Some(Value::String(s)) => rendered.push_str(s),
            Some(Value::Null) | None => {
                return Err(FlowError::InvalidInput(format!("no value for placeholder '{}'", key)))
            }
            Some(other) => rendered.push_str(&other.to_string()),
        }

        rest = &after[end + 3..];
    }

    rendered.push_str(rest);
    Ok(rendered)
}

/// Finds the outermost JSON object in a model reply, ignoring any prose or
/// Markdown fences around it.
pub(crate) fn extract_json_object(reply: &str) -> Option<&str> {
    let start = reply.find('{')?;
    let end = reply.rfind('}')?;
    (end > start).then(|| &reply[start..=end])
}

fn parse_output<O>(reply: &str) -> Result<O, FlowError>
where
    O: DeserializeOwned + Validate,
{
    let json = extract_json_object(reply)
        .ok_or_else(|| FlowError::Schema("reply contains no JSON object".to_string()))?;

    let output: O = serde_json::from_str(json).map_err(|e| FlowError::Schema(e.to_string()))?;
    output
        .validate()
        .map_err(|e| FlowError::Schema(e.to_string()))?;

    Ok(output)
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
