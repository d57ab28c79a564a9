//! Wire types for the legal question-answering API

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body of legislation the backend searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegalField {
    #[default]
    Criminal,
    Constitution,
}

impl LegalField {
    pub const ALL: [LegalField; 2] = [LegalField::Criminal, LegalField::Constitution];

    pub fn as_str(self) -> &'static str {
        match self {
            LegalField::Criminal => "criminal",
            LegalField::Constitution => "constitution",
        }
    }
}

impl FromStr for LegalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "criminal" => Ok(LegalField::Criminal),
            "constitution" => Ok(LegalField::Constitution),
            other => Err(format!("unknown legal field: {other}")),
        }
    }
}

impl fmt::Display for LegalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language of the generated answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Fr, Language::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of feedback a user can leave on an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Positive,
    Negative,
    Correction,
}

impl FeedbackType {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Positive => "positive",
            FeedbackType::Negative => "negative",
            FeedbackType::Correction => "correction",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests
// ============================================================================

/// `POST /query` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub query: String,
    pub field: LegalField,
    pub language: Language,
    pub top_k: u8,
    pub max_tokens: u16,
    pub temperature: f32,
    pub enable_reflection: bool,
}

/// `POST /feedback` body. Absent texts are sent as explicit nulls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackRequest {
    pub query_id: String,
    pub feedback_type: FeedbackType,
    pub correction_text: Option<String>,
    pub comments: Option<String>,
}

/// `POST /reflect` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReflectRequest<'a> {
    pub query_id: &'a str,
}

// ============================================================================
// Responses
// ============================================================================

/// `POST /query` 200 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub query_id: String,
    pub answer: String,
    pub retrieved_documents: Vec<ReferenceDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

/// A retrieved passage shown to justify an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    pub text: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
}

/// Citation details. `page` and `article` arrive as either numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, deserialize_with = "display_text")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "display_text")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "display_text")]
    pub article: Option<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.page.is_none() && self.article.is_none()
    }
}

/// `POST /reflect` 200 response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReflectionResponse {
    pub reflection: String,
}

/// `GET /stats` 200 response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatsResponse {
    pub queries_processed: u64,
    pub documents_loaded: BTreeMap<String, u64>,
    pub feedback_stats: FeedbackStats,
}

impl StatsResponse {
    pub fn total_documents(&self) -> u64 {
        self.documents_loaded.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedbackStats {
    pub positive: u64,
    pub negative: u64,
    pub corrections: u64,
}

fn display_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
