//! Settings translation for the Ollama backend.
//!
//! Maps canonical sampling/reasoning settings into the `options` map and
//! `think` field of an Ollama chat request. Both functions are pure and
//! total: every settings value produces a defined result and no branch
//! errors.

use serde_json::json;

use super::types::ThinkValue;
use crate::types::{ModelSettings, ReasoningEffort, ReasoningSetting};

/// Build the nested `options` object from canonical settings.
///
/// Numeric sampling settings map 1:1. Stop sequences and seed ride along
/// when present. Settings the backend has no equivalent for (tool choice)
/// are left out here and logged by the request translator.
pub fn build_model_options(
    settings: &ModelSettings,
) -> serde_json::Map<String, serde_json::Value> {
    let mut options = serde_json::Map::new();

    if let Some(temperature) = settings.temperature {
        options.insert("temperature".to_string(), json!(temperature));
    }
    if let Some(top_p) = settings.top_p {
        options.insert("top_p".to_string(), json!(top_p));
    }
    if let Some(frequency_penalty) = settings.frequency_penalty {
        options.insert("frequency_penalty".to_string(), json!(frequency_penalty));
    }
    if let Some(presence_penalty) = settings.presence_penalty {
        options.insert("presence_penalty".to_string(), json!(presence_penalty));
    }
    if let Some(stop) = &settings.stop_sequences {
        options.insert("stop".to_string(), json!(stop));
    }
    if let Some(seed) = settings.seed {
        options.insert("seed".to_string(), json!(seed));
    }

    options
}

/// Map the canonical reasoning setting onto the `think` field.
///
/// Total over the whole input domain:
/// - effort `minimal` → `"low"` (the backend's lowest level)
/// - effort `low` / `medium` / `high` → passthrough
/// - `effort: null` → `false` (reasoning disabled)
/// - legacy flag `false` → `false`; legacy flag `true` → `true`
/// - setting absent → no field
pub fn map_reasoning(reasoning: Option<&ReasoningSetting>) -> Option<ThinkValue> {
    match reasoning? {
        ReasoningSetting::Flag(enabled) => Some(ThinkValue::Enabled(*enabled)),
        ReasoningSetting::Config { effort: None } => Some(ThinkValue::Enabled(false)),
        ReasoningSetting::Config {
            effort: Some(effort),
        } => {
            let level = match effort {
                ReasoningEffort::Minimal | ReasoningEffort::Low => "low",
                ReasoningEffort::Medium => "medium",
                ReasoningEffort::High => "high",
            };
            Some(ThinkValue::Level(level.to_string()))
        }
    }
}
