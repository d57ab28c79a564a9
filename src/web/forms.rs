//! Form bodies posted by the chat page

use crate::api_client::{FeedbackType, Language, LegalField};
use crate::state_machine::SettingsPatch;
use serde::Deserialize;

/// Question box
#[derive(Debug, Deserialize)]
pub struct QueryForm {
    pub query: String,
}

/// Rating buttons and the correction form
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub feedback_type: FeedbackType,
    #[serde(default)]
    pub correction_text: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Sidebar settings. The sidebar always posts every field, so an absent
/// checkbox means reflection was switched off.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub enable_reflection: Option<String>,
    #[serde(default)]
    pub field: Option<LegalField>,
    #[serde(default)]
    pub language: Option<Language>,
}

impl SettingsForm {
    pub fn patch(&self) -> SettingsPatch {
        SettingsPatch {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_k: self.top_k,
            enable_reflection: Some(self.enable_reflection.is_some()),
        }
    }
}
