//! Persisted shapes and their boundary validation.
//!
//! Request types deserialize leniently (every field optional) so that
//! validation can report all problems at once, keyed by field name.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::{AppError, FieldErrors};
use crate::llm::prompts::{self, FunctionType};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

const MAX_KEY_LEN: usize = 50;
const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NOT_AN_INTEGER: &str = "A valid integer is required.";

/// One successful query/response pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: i64,
    pub function_type: String,
    pub style: String,
    pub query: String,
    pub response: String,
    pub processing_time: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub function_type: String,
    pub style: String,
    pub query: String,
    pub response: String,
    pub processing_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    pub query_id: Option<i64>,
    pub function_type: String,
    pub query: String,
    pub response: String,
    pub rating: u8,
    pub suggestions: String,
    pub created_at: DateTime<Utc>,
}

/// Feedback that passed validation and is ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    pub query_id: Option<i64>,
    pub function_type: String,
    pub query: String,
    pub response: String,
    pub rating: u8,
    pub suggestions: String,
}

/// Feedback as kept in the interactive front end's JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub function_type: String,
    pub query: String,
    pub response: String,
    pub rating: u8,
    pub timestamp: DateTime<Local>,
    #[serde(default)]
    pub suggestions: String,
}

/// Reject ratings outside 1..=5. Never clamps.
pub fn validate_rating(rating: i64) -> Result<u8, AppError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating as u8)
    } else {
        Err(AppError::invalid("rating", "Rating must be between 1 and 5"))
    }
}

impl NewFeedback {
    pub fn new(
        function_type: impl Into<String>,
        query: impl Into<String>,
        response: impl Into<String>,
        rating: i64,
        suggestions: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            query_id: None,
            function_type: function_type.into(),
            query: query.into(),
            response: response.into(),
            rating: validate_rating(rating)?,
            suggestions: suggestions.into(),
        })
    }

    pub fn with_query_id(mut self, query_id: i64) -> Self {
        self.query_id = Some(query_id);
        self
    }

    pub fn into_entry(self, timestamp: DateTime<Local>) -> FeedbackEntry {
        FeedbackEntry {
            function_type: self.function_type,
            query: self.query,
            response: self.response,
            rating: self.rating,
            timestamp,
            suggestions: self.suggestions,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryRequest {
    pub function_type: Option<String>,
    pub style: Option<String>,
    pub query: Option<String>,
}

/// A query whose function type and style are both in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidQuery {
    pub function_type: FunctionType,
    pub style: String,
    pub query: String,
}

impl QueryRequest {
    /// Unknown function types and unknown styles are rejected here, against
    /// the same enumeration the styles endpoint serves.
    pub fn validate(self) -> Result<ValidQuery, AppError> {
        let mut errors = FieldErrors::new();

        let function_type = match required(&mut errors, "function_type", self.function_type) {
            Some(raw) => match FunctionType::from_str(&raw) {
                Ok(ft) => Some(ft),
                Err(e) => {
                    push(&mut errors, "function_type", e.to_string());
                    None
                }
            },
            None => None,
        };

        let style = required(&mut errors, "style", self.style)
            .and_then(|s| bounded(&mut errors, "style", s));
        if let (Some(ft), Some(style)) = (function_type, style.as_deref()) {
            if !prompts::is_known_style(ft.as_str(), style) {
                push(
                    &mut errors,
                    "style",
                    format!("\"{}\" is not a valid style for {}.", style, ft),
                );
            }
        }

        let query = required(&mut errors, "query", self.query);

        match (function_type, style, query) {
            (Some(function_type), Some(style), Some(query)) if errors.is_empty() => Ok(ValidQuery {
                function_type,
                style,
                query,
            }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackRequest {
    pub query_id: Option<i64>,
    pub function_type: Option<String>,
    pub query: Option<String>,
    pub response: Option<String>,
    /// Kept untyped so a non-integer is reported against `rating` itself.
    pub rating: Option<Value>,
    pub suggestions: Option<String>,
}

impl FeedbackRequest {
    pub fn validate(self) -> Result<NewFeedback, AppError> {
        let mut errors = FieldErrors::new();

        let function_type = required(&mut errors, "function_type", self.function_type)
            .and_then(|s| bounded(&mut errors, "function_type", s));
        let query = required(&mut errors, "query", self.query);
        let response = required(&mut errors, "response", self.response);

        let rating = match self.rating.as_ref().map(integer_value) {
            Some(Some(value)) => match validate_rating(value) {
                Ok(r) => Some(r),
                Err(AppError::Validation(rating_errors)) => {
                    errors.extend(rating_errors);
                    None
                }
                Err(other) => return Err(other),
            },
            Some(None) => {
                push(&mut errors, "rating", NOT_AN_INTEGER.to_string());
                None
            }
            None => {
                push(&mut errors, "rating", REQUIRED.to_string());
                None
            }
        };

        match (function_type, query, response, rating) {
            (Some(function_type), Some(query), Some(response), Some(rating))
                if errors.is_empty() =>
            {
                Ok(NewFeedback {
                    query_id: self.query_id,
                    function_type,
                    query,
                    response,
                    rating,
                    suggestions: self.suggestions.unwrap_or_default(),
                })
            }
            _ => Err(AppError::Validation(errors)),
        }
    }
}

/// JSON integers and strings holding one. Floats, booleans and the rest are not.
fn integer_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: String) {
    errors.entry(field.to_string()).or_default().push(message);
}

/// Present and not blank after trimming. Returns the trimmed value.
fn required(errors: &mut FieldErrors, field: &str, value: Option<String>) -> Option<String> {
    match value {
        None => {
            push(errors, field, REQUIRED.to_string());
            None
        }
        Some(v) if v.trim().is_empty() => {
            push(errors, field, BLANK.to_string());
            None
        }
        Some(v) => Some(v.trim().to_string()),
    }
}

fn bounded(errors: &mut FieldErrors, field: &str, value: String) -> Option<String> {
    if value.chars().count() > MAX_KEY_LEN {
        push(
            errors,
            field,
            format!("Ensure this field has no more than {} characters.", MAX_KEY_LEN),
        );
        None
    } else {
        Some(value)
    }
}
