//! Per-request chat options and the sidebar controls that produce them
//!
//! Every knob is an independent scalar with its own range. There is no
//! cross-field validation.

use serde::Deserialize;
use serde::Serialize;

use crate::errors::RagChatError;
use crate::errors::Result;
use crate::llm::SamplingParams;

pub const FETCH_K_RANGE: (usize, usize) = (1, 20);
pub const MAX_TOKENS_RANGE: (u32, u32) = (10, 1024);
pub const TEMPERATURE_RANGE: (f32, f32) = (0.0, 1.0);
pub const TOP_K_RANGE: (u32, u32) = (0, 500);
pub const TOP_P_RANGE: (f32, f32) = (0.0, 0.99);
pub const PENALTY_RANGE: (f32, f32) = (0.0, 1.0);

/// Snapshot of the sidebar values for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatOptions {
    pub use_vector_search: bool,
    pub fetch_k: usize,
    pub streaming: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            use_vector_search: true,
            fetch_k: 5,
            streaming: true,
            max_tokens: 500,
            temperature: 0.3,
            top_k: 0,
            top_p: 0.75,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

fn check_range<T: PartialOrd + std::fmt::Display>(name: &str, value: T, range: (T, T)) -> Result<()> {
    // NaN fails both comparisons and is rejected here too
    if value >= range.0 && value <= range.1 {
        Ok(())
    } else {
        Err(RagChatError::InvalidOption(format!(
            "{name} = {value} is outside [{}, {}]",
            range.0, range.1
        )))
    }
}

impl ChatOptions {
    /// Check each knob against its own range
    pub fn validate(&self) -> Result<()> {
        check_range("fetch_k", self.fetch_k, FETCH_K_RANGE)?;
        check_range("max_tokens", self.max_tokens, MAX_TOKENS_RANGE)?;
        check_range("temperature", self.temperature, TEMPERATURE_RANGE)?;
        check_range("top_k", self.top_k, TOP_K_RANGE)?;
        check_range("top_p", self.top_p, TOP_P_RANGE)?;
        check_range("frequency_penalty", self.frequency_penalty, PENALTY_RANGE)?;
        check_range("presence_penalty", self.presence_penalty, PENALTY_RANGE)?;
        Ok(())
    }

    /// Apply the keys present in `overrides` on top of `self`
    ///
    /// Keys the caller leaves out keep the value from `self`, not the
    /// built-in default.
    pub fn with_overrides(&self, overrides: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(overrides) = overrides else {
            return Err(RagChatError::InvalidOption(
                "options must be a JSON object".to_string(),
            ));
        };

        let mut merged = serde_json::to_value(self)?;
        if let serde_json::Value::Object(base) = &mut merged {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }

        serde_json::from_value(merged).map_err(|e| RagChatError::InvalidOption(e.to_string()))
    }

    /// Sampling parameters handed to the chat model verbatim
    #[must_use]
    pub const fn sampling(&self) -> SamplingParams {
        SamplingParams {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
        }
    }
}

/// Kind of widget used to render an option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    Toggle,
    Slider,
    Number,
}

/// Description of one sidebar control
#[derive(Debug, Clone, Serialize)]
pub struct OptionSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub section: &'static str,
    pub kind: ControlKind,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: serde_json::Value,
}

fn toggle(key: &'static str, label: &'static str, section: &'static str, default: bool) -> OptionSpec {
    OptionSpec {
        key,
        label,
        section,
        kind: ControlKind::Toggle,
        min: 0.0,
        max: 1.0,
        step: 1.0,
        default: serde_json::Value::Bool(default),
    }
}

fn numeric(
    key: &'static str,
    label: &'static str,
    kind: ControlKind,
    range: (f64, f64),
    step: f64,
    default: serde_json::Value,
) -> OptionSpec {
    OptionSpec {
        key,
        label,
        section: "LLM Options",
        kind,
        min: range.0,
        max: range.1,
        step,
        default,
    }
}

// f32 -> f64 without the representation noise (0.3 stays 0.3)
fn widen(value: f32) -> f64 {
    (f64::from(value) * 100.0).round() / 100.0
}

/// Sidebar controls in display order, seeded with the given defaults
#[must_use]
pub fn option_specs(defaults: &ChatOptions) -> Vec<OptionSpec> {
    use serde_json::json;

    let mut fetch_k = numeric(
        "fetch_k",
        "Fetch k",
        ControlKind::Slider,
        (FETCH_K_RANGE.0 as f64, FETCH_K_RANGE.1 as f64),
        1.0,
        json!(defaults.fetch_k),
    );
    fetch_k.section = "Vector Search Options";

    vec![
        toggle(
            "use_vector_search",
            "Use Vector Search",
            "Vector Search Options",
            defaults.use_vector_search,
        ),
        fetch_k,
        toggle("streaming", "Streaming", "LLM Options", defaults.streaming),
        numeric(
            "max_tokens",
            "Max Tokens",
            ControlKind::Number,
            (f64::from(MAX_TOKENS_RANGE.0), f64::from(MAX_TOKENS_RANGE.1)),
            1.0,
            json!(defaults.max_tokens),
        ),
        numeric(
            "temperature",
            "Temperature",
            ControlKind::Slider,
            (f64::from(TEMPERATURE_RANGE.0), f64::from(TEMPERATURE_RANGE.1)),
            0.1,
            json!(widen(defaults.temperature)),
        ),
        numeric(
            "top_k",
            "Top k",
            ControlKind::Slider,
            (f64::from(TOP_K_RANGE.0), f64::from(TOP_K_RANGE.1)),
            1.0,
            json!(defaults.top_k),
        ),
        numeric(
            "top_p",
            "Top p",
            ControlKind::Slider,
            (0.0, 0.99),
            0.01,
            json!(widen(defaults.top_p)),
        ),
        numeric(
            "frequency_penalty",
            "Frequency Penalty",
            ControlKind::Slider,
            (f64::from(PENALTY_RANGE.0), f64::from(PENALTY_RANGE.1)),
            0.1,
            json!(widen(defaults.frequency_penalty)),
        ),
        numeric(
            "presence_penalty",
            "Presence Penalty",
            ControlKind::Slider,
            (f64::from(PENALTY_RANGE.0), f64::from(PENALTY_RANGE.1)),
            0.1,
            json!(widen(defaults.presence_penalty)),
        ),
    ]
}
