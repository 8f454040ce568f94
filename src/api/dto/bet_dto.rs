//! Bet placement request DTO.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{SlipText, WagerSlip};

/// A numeric field that clients may send as a JSON number or as a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// JSON number.
    Number(serde_json::Number),
    /// JSON string.
    Text(String),
    /// Anything else; kept so validation can name the field.
    Other(serde_json::Value),
}

impl NumericInput {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
            Self::Other(v) => v.to_string(),
        }
    }
}

/// A text field; values of other JSON types are kept for validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    /// JSON string.
    Text(String),
    /// Anything else.
    Other(serde_json::Value),
}

impl From<TextInput> for SlipText {
    fn from(input: TextInput) -> Self {
        match input {
            TextInput::Text(s) => Self::Text(s),
            TextInput::Other(v) => Self::NotText(v.to_string()),
        }
    }
}

/// Request body for `POST /api/bets`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBetRequest {
    /// Event id from the events feed.
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 1001)]
    pub event_id: Option<NumericInput>,
    /// Event display name.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Spartak - CSKA")]
    pub event_name: Option<TextInput>,
    /// Selection label (e.g. `win1`, `draw`, `win2`).
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "win1")]
    pub selection: Option<TextInput>,
    /// Quoted decimal odds.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2.50")]
    pub odds: Option<NumericInput>,
    /// Stake in whole coins.
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "100")]
    pub amount: Option<NumericInput>,
}

impl From<PlaceBetRequest> for WagerSlip {
    fn from(req: PlaceBetRequest) -> Self {
        Self {
            event_id: req.event_id.map(NumericInput::into_text),
            event_name: req.event_name.map(SlipText::from),
            selection: req.selection.map(SlipText::from),
            odds: req.odds.map(NumericInput::into_text),
            amount: req.amount.map(NumericInput::into_text),
        }
    }
}
