#![forbid(unsafe_code)]

//! The `{success, data}` JSON envelope returned by the filtering endpoint.
//!
//! Success responses carry server-rendered HTML fragments plus pagination
//! counters and the active-filter chip list. Failure responses reuse the
//! same envelope with `success: false` and an optional message object;
//! both failure shapes and outright malformed bodies decode to an error,
//! and the caller treats every error the same way (full-page fallback).

use serde::{Deserialize, Serialize};
use storefacet_core::category::CategoryId;
use storefacet_core::state::FilterKind;

/// Decoded payload of a successful filter response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterResults {
    /// Product grid markup.
    pub products: String,
    /// Pagination control markup.
    pub pagination: String,
    /// "Showing X of Y" markup.
    pub result_count: String,
    /// Total matching products.
    pub total: u32,
    /// Total pages at the current page size.
    pub total_pages: u32,
    /// The page these fragments describe, 1-based.
    pub current_page: u32,
    /// Chips describing the filters the server actually applied.
    #[serde(default)]
    pub active_filters: Vec<ActiveFilter>,
}

/// One active-filter chip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilter {
    /// Which filter family the chip removes.
    #[serde(rename = "type")]
    pub kind: FilterKind,
    /// User-facing chip label.
    pub label: String,
    /// Category id, present only for category chips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
}

/// Why a response body could not be used.
#[derive(Debug)]
pub enum EnvelopeError {
    /// Body was not valid JSON, or valid JSON of the wrong shape.
    Malformed(serde_json::Error),
    /// Endpoint answered with `success: false`.
    Rejected {
        /// Server-provided failure message, when one was sent.
        message: Option<String>,
    },
}

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvelopeError::Malformed(err) => write!(f, "malformed response envelope: {err}"),
            EnvelopeError::Rejected { message: Some(msg) } => {
                write!(f, "endpoint rejected request: {msg}")
            }
            EnvelopeError::Rejected { message: None } => {
                write!(f, "endpoint rejected request")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EnvelopeError::Malformed(err) => Some(err),
            EnvelopeError::Rejected { .. } => None,
        }
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        EnvelopeError::Malformed(err)
    }
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    success: bool,
    data: &'a FilterResults,
}

/// Decode a response body into [`FilterResults`].
pub fn decode(body: &str) -> Result<FilterResults, EnvelopeError> {
    let raw: RawEnvelope = serde_json::from_str(body)?;
    if !raw.success {
        let message = raw
            .data
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned);
        return Err(EnvelopeError::Rejected { message });
    }
    serde_json::from_value(raw.data).map_err(EnvelopeError::Malformed)
}

/// Encode a success envelope. Used by test fixtures and the harness's
/// scripted server.
pub fn encode(results: &FilterResults) -> Result<String, serde_json::Error> {
    serde_json::to_string(&EnvelopeOut {
        success: true,
        data: results,
    })
}

/// Encode a `success: false` envelope with an optional message.
#[must_use]
pub fn encode_failure(message: Option<&str>) -> String {
    match message {
        Some(msg) => serde_json::json!({ "success": false, "data": { "message": msg } }),
        None => serde_json::json!({ "success": false }),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> FilterResults {
        FilterResults {
            products: "<ul class=\"products\"></ul>".into(),
            pagination: "<nav></nav>".into(),
            result_count: "<p>Showing 1-12 of 40</p>".into(),
            total: 40,
            total_pages: 4,
            current_page: 1,
            active_filters: vec![
                ActiveFilter {
                    kind: FilterKind::Category,
                    label: "Lamps".into(),
                    id: Some(CategoryId::new(12)),
                },
                ActiveFilter {
                    kind: FilterKind::OnSale,
                    label: "On sale".into(),
                    id: None,
                },
            ],
        }
    }

    #[test]
    fn decodes_success_envelope() {
        let body = r#"{
            "success": true,
            "data": {
                "products": "<ul></ul>",
                "pagination": "",
                "result_count": "<p>2 results</p>",
                "total": 2,
                "total_pages": 1,
                "current_page": 1,
                "active_filters": [
                    {"type": "category", "label": "Lamps", "id": 12},
                    {"type": "price", "label": "10 - 50"}
                ]
            }
        }"#;

        let results = decode(body).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.active_filters.len(), 2);
        assert_eq!(results.active_filters[0].kind, FilterKind::Category);
        assert_eq!(results.active_filters[0].id, Some(CategoryId::new(12)));
        assert_eq!(results.active_filters[1].kind, FilterKind::Price);
        assert_eq!(results.active_filters[1].id, None);
    }

    #[test]
    fn missing_active_filters_defaults_to_empty() {
        let body = r#"{"success": true, "data": {
            "products": "", "pagination": "", "result_count": "",
            "total": 0, "total_pages": 0, "current_page": 1
        }}"#;
        let results = decode(body).unwrap();
        assert!(results.active_filters.is_empty());
    }

    #[test]
    fn rejection_with_message() {
        let body = r#"{"success": false, "data": {"message": "bad nonce"}}"#;
        match decode(body) {
            Err(EnvelopeError::Rejected { message }) => {
                assert_eq!(message.as_deref(), Some("bad nonce"));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_message() {
        match decode(r#"{"success": false}"#) {
            Err(EnvelopeError::Rejected { message: None }) => {}
            other => panic!("expected bare rejection, got {other:?}"),
        }
    }

    #[test]
    fn malformed_bodies_are_malformed() {
        assert!(matches!(decode("<html>504</html>"), Err(EnvelopeError::Malformed(_))));
        assert!(matches!(decode(""), Err(EnvelopeError::Malformed(_))));
        // Valid JSON, wrong shape under data.
        assert!(matches!(
            decode(r#"{"success": true, "data": {"products": 3}}"#),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn encode_decode_agree() {
        let results = sample();
        let body = encode(&results).unwrap();
        assert_eq!(decode(&body).unwrap(), results);
    }

    #[test]
    fn failure_encoder_round_trips_through_decode() {
        match decode(&encode_failure(Some("nope"))) {
            Err(EnvelopeError::Rejected { message }) => {
                assert_eq!(message.as_deref(), Some("nope"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            decode(&encode_failure(None)),
            Err(EnvelopeError::Rejected { message: None })
        ));
    }

    #[test]
    fn error_display_is_reasonable() {
        let err = EnvelopeError::Rejected {
            message: Some("bad nonce".into()),
        };
        assert_eq!(err.to_string(), "endpoint rejected request: bad nonce");
    }
}
