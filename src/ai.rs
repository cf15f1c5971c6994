use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::models::{FilterCriteria, InterpretedQuery, ProfilePatch};

// --- Interpreter trait ---

/// A backend that turns a free-text phrase into a structured query. The
/// remote implementation may fail; callers go through [`interpret`], which
/// contains every failure behind the deterministic keyword fallback.
pub trait QueryInterpreter {
    fn interpret(&self, free_text: &str) -> Result<InterpretedQuery>;
    #[allow(dead_code)]
    fn backend_name(&self) -> &str;
}

/// Builds the remote backend when `GEMINI_API_KEY` is set, otherwise `None`
/// (keyword-only mode).
pub fn configured_backend() -> Option<Box<dyn QueryInterpreter>> {
    match GeminiInterpreter::new() {
        Ok(backend) => Some(Box::new(backend)),
        Err(_) => None,
    }
}

// --- Containment boundary ---

/// Why the deterministic fallback ran instead of the remote backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoBackend,
    BackendFailed,
}

/// Interprets the phrase, never failing across this boundary: any backend
/// fault (missing key, network, timeout, malformed response) degrades to
/// keyword-only matching, reported to the user through the explanation.
pub fn interpret(backend: Option<&dyn QueryInterpreter>, free_text: &str) -> InterpretedQuery {
    let text = free_text.trim();
    match backend {
        Some(backend) => match backend.interpret(text) {
            Ok(interpreted) => interpreted,
            Err(err) => {
                eprintln!("AI backend unavailable, falling back to keywords: {err:#}");
                keyword_fallback(text, FallbackReason::BackendFailed)
            }
        },
        None => keyword_fallback(text, FallbackReason::NoBackend),
    }
}

/// The whole phrase becomes one case-insensitive keyword filter. Degraded
/// precision, but always a successful interpretation.
pub fn keyword_fallback(free_text: &str, reason: FallbackReason) -> InterpretedQuery {
    let text = free_text.trim();
    let explanation = match reason {
        FallbackReason::NoBackend => {
            "No AI backend is configured, so I matched your request as plain keywords."
        }
        FallbackReason::BackendFailed => {
            "I had trouble reaching the AI backend, but I've searched for keywords matching your request!"
        }
    };
    InterpretedQuery {
        synthesized_query: format!(
            "SELECT * FROM opportunities WHERE description LIKE '%{text}%'"
        ),
        filters: FilterCriteria {
            keyword: Some(text.to_string()),
            ..FilterCriteria::default()
        },
        explanation: explanation.to_string(),
    }
}

// --- Gemini backend ---

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const SYSTEM_INSTRUCTION: &str = r#"You are an intelligent query generator for a catalog of youth opportunities.

Fields:
- title (string)
- organization (string)
- type (Enum: 'Scholarship', 'Internship', 'Workshop', 'Mentorship', 'Entry Level Job', 'Apprenticeship')
- category (Enum: 'Technology', 'Arts & Design', 'Skilled Trades', 'Academic', 'Community Service')
- is_remote (boolean)
- stipend_amount (number)
- location (string)

Translate the user's request into a JSON object with exactly these keys:
1. "query": a readable SQL-style representation (e.g. "SELECT * FROM opportunities WHERE ...")
2. "filters": an object with optional keys "type", "category", "is_remote", "minStipend", "anyKeyword" matching the query logic. Only use enum values from the lists above.
3. "explanation": a brief, encouraging explanation for the user.

If the user asks for something vague, broaden the search.
If they mention "paid", set minStipend to 1.
Respond with the JSON object only."#;

const RESUME_INSTRUCTION: &str = r#"Extract structured profile data from the resume text you are given.

Respond with a JSON object with these keys:
1. "bio": a short professional summary (max 30 words) based on the resume.
2. "skills": a list of technical or soft skills found.
3. "experience": a list of objects with keys "role", "company", "duration".

Respond with the JSON object only."#;

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug)]
pub struct GeminiInterpreter {
    api_key: String,
    model_id: String,
    client: reqwest::blocking::Client,
}

impl GeminiInterpreter {
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_MODEL)
    }

    pub fn with_model(model_id: &str) -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY environment variable not set. Set it with: export GEMINI_API_KEY=your-key-here")?;
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_key,
            model_id: model_id.to_string(),
            client,
        })
    }

    fn generate(&self, system_instruction: &str, user_text: &str) -> Result<String> {
        let request = GeminiRequest {
            system_instruction: GeminiContent {
                parts: vec![GeminiPart {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: user_text.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        let url = format!("{}/{}:generateContent", GEMINI_API_URL, self.model_id);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow!(
                "Gemini API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let api_response: GeminiResponse = response
            .json()
            .context("Failed to parse Gemini API response")?;

        api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow!("No content in Gemini API response"))
    }

    /// Extracts profile fields from raw resume text. Unlike query
    /// interpretation there is no degraded fallback: without a working
    /// backend the caller gets the error.
    pub fn parse_resume(&self, resume_text: &str) -> Result<ProfilePatch> {
        let text = self.generate(RESUME_INSTRUCTION, resume_text)?;
        parse_resume_payload(&text)
    }
}

impl QueryInterpreter for GeminiInterpreter {
    fn interpret(&self, free_text: &str) -> Result<InterpretedQuery> {
        let text = self.generate(SYSTEM_INSTRUCTION, free_text)?;
        parse_interpretation(&text)
    }

    fn backend_name(&self) -> &str {
        &self.model_id
    }
}

// --- Response parsing ---

#[derive(Debug, Default, Deserialize)]
struct RawFilters {
    #[serde(rename = "type")]
    kind: Option<String>,
    category: Option<String>,
    is_remote: Option<bool>,
    #[serde(rename = "minStipend")]
    min_stipend: Option<f64>,
    #[serde(rename = "anyKeyword")]
    any_keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInterpretation {
    #[serde(default, alias = "sql")]
    query: String,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    filters: RawFilters,
}

/// Parses the model's JSON payload. Enum strings outside the fixed
/// vocabularies are dropped (treated as unset), never propagated as a
/// filter that matches nothing.
fn parse_interpretation(text: &str) -> Result<InterpretedQuery> {
    let raw: RawInterpretation = serde_json::from_str(strip_code_fences(text))
        .context("Gemini returned malformed interpretation JSON")?;

    let filters = FilterCriteria {
        kind: raw.filters.kind.as_deref().and_then(|s| s.parse().ok()),
        category: raw.filters.category.as_deref().and_then(|s| s.parse().ok()),
        is_remote: raw.filters.is_remote,
        min_stipend: raw
            .filters
            .min_stipend
            .filter(|n| *n > 0.0)
            .map(|n| n.round() as u32),
        keyword: raw.filters.any_keyword.filter(|k| !k.trim().is_empty()),
        poster_user_id: None,
    };

    Ok(InterpretedQuery {
        synthesized_query: raw.query,
        filters,
        explanation: raw.explanation,
    })
}

/// Parses the resume-extraction payload into a profile patch. Fields the
/// model omits stay unset and leave the stored profile untouched.
fn parse_resume_payload(text: &str) -> Result<ProfilePatch> {
    serde_json::from_str(strip_code_fences(text))
        .context("Gemini returned malformed resume JSON")
}

/// Models sometimes wrap JSON in a markdown fence despite the mime-type
/// hint.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, OpportunityType};

    #[test]
    fn test_fallback_keyword_is_trimmed_input() {
        let out = keyword_fallback("  paid coding internships  ", FallbackReason::NoBackend);
        assert_eq!(out.filters.keyword.as_deref(), Some("paid coding internships"));
        assert!(out.filters.kind.is_none());
        assert!(out.filters.min_stipend.is_none());
        assert!(out.synthesized_query.contains("paid coding internships"));
    }

    #[test]
    fn test_interpret_without_backend_never_fails() {
        let out = interpret(None, "cool stuff");
        assert_eq!(out.filters.keyword.as_deref(), Some("cool stuff"));
        assert!(out.explanation.contains("keywords"));
    }

    #[test]
    fn test_interpret_contains_backend_failure() {
        struct Broken;
        impl QueryInterpreter for Broken {
            fn interpret(&self, _free_text: &str) -> Result<InterpretedQuery> {
                Err(anyhow!("connection refused"))
            }
            fn backend_name(&self) -> &str {
                "broken"
            }
        }

        let out = interpret(Some(&Broken), "welding apprenticeships");
        assert_eq!(out.filters.keyword.as_deref(), Some("welding apprenticeships"));
        assert!(out.explanation.contains("trouble"));
    }

    #[test]
    fn test_parse_interpretation_full() {
        let payload = r#"{
            "query": "SELECT * FROM opportunities WHERE type = 'Internship' AND stipend_amount >= 1",
            "explanation": "Here are paid internships!",
            "filters": {
                "type": "Internship",
                "minStipend": 1,
                "anyKeyword": "coding"
            }
        }"#;
        let out = parse_interpretation(payload).unwrap();
        assert_eq!(out.filters.kind, Some(OpportunityType::Internship));
        assert_eq!(out.filters.min_stipend, Some(1));
        assert_eq!(out.filters.keyword.as_deref(), Some("coding"));
        assert!(out.synthesized_query.starts_with("SELECT"));
    }

    #[test]
    fn test_parse_interpretation_drops_unknown_enums() {
        let payload = r#"{
            "query": "SELECT * FROM opportunities",
            "explanation": "ok",
            "filters": {
                "type": "Volunteering",
                "category": "Sports",
                "is_remote": true
            }
        }"#;
        let out = parse_interpretation(payload).unwrap();
        assert!(out.filters.kind.is_none());
        assert!(out.filters.category.is_none());
        assert_eq!(out.filters.is_remote, Some(true));
    }

    #[test]
    fn test_parse_interpretation_multiword_enums() {
        let payload = r#"{
            "query": "q",
            "explanation": "e",
            "filters": { "type": "Entry Level Job", "category": "Arts & Design" }
        }"#;
        let out = parse_interpretation(payload).unwrap();
        assert_eq!(out.filters.kind, Some(OpportunityType::EntryLevelJob));
        assert_eq!(out.filters.category, Some(Category::ArtsDesign));
    }

    #[test]
    fn test_parse_interpretation_accepts_sql_alias_and_fences() {
        let payload = "```json\n{\"sql\": \"SELECT 1\", \"explanation\": \"e\", \"filters\": {}}\n```";
        let out = parse_interpretation(payload).unwrap();
        assert_eq!(out.synthesized_query, "SELECT 1");
    }

    #[test]
    fn test_parse_interpretation_rejects_garbage() {
        assert!(parse_interpretation("not json at all").is_err());
    }

    #[test]
    fn test_negative_stipend_is_dropped() {
        let payload = r#"{"query": "q", "explanation": "e", "filters": {"minStipend": -5}}"#;
        let out = parse_interpretation(payload).unwrap();
        assert!(out.filters.min_stipend.is_none());
    }

    #[test]
    fn test_parse_resume_payload_full() {
        let payload = r#"{
            "bio": "Welder with two seasons of field experience.",
            "skills": ["TIG welding", "Blueprint reading"],
            "experience": [
                {"role": "Apprentice", "company": "IronWorks Union", "duration": "2023-2024"}
            ]
        }"#;
        let patch = parse_resume_payload(payload).unwrap();
        assert_eq!(
            patch.bio.as_deref(),
            Some("Welder with two seasons of field experience.")
        );
        assert_eq!(patch.skills.as_ref().map(Vec::len), Some(2));
        let experience = patch.experience.unwrap();
        assert_eq!(experience[0].company, "IronWorks Union");
        assert!(patch.name.is_none());
    }

    #[test]
    fn test_parse_resume_payload_partial_and_fenced() {
        let payload = "```json\n{\"bio\": \"Short summary.\"}\n```";
        let patch = parse_resume_payload(payload).unwrap();
        assert_eq!(patch.bio.as_deref(), Some("Short summary."));
        assert!(patch.skills.is_none());
        assert!(patch.experience.is_none());
    }

    #[test]
    fn test_parse_resume_payload_rejects_garbage() {
        assert!(parse_resume_payload("resume goes here").is_err());
    }

    #[test]
    fn test_gemini_interpreter_requires_api_key() {
        let original = env::var("GEMINI_API_KEY").ok();
        unsafe {
            env::remove_var("GEMINI_API_KEY");
        }

        let result = GeminiInterpreter::new();

        if let Some(val) = original {
            unsafe {
                env::set_var("GEMINI_API_KEY", val);
            }
        }

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("GEMINI_API_KEY"));
    }
}
