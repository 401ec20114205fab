use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::priority::{LeadPriorityInput, PriorityBucket};

/// A lead as read from a batch file: identity plus priority signals.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadRecord {
    pub id: String,
    pub name: Option<String>,
    pub signals: LeadPriorityInput,
}

impl LeadRecord {
    /// Name for display, falling back to the id
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Parse lead rows from a JSON value.
///
/// Accepts either a bare array or an object with a `leads` array. Rows that
/// are not objects or have no usable id are skipped with a warning. Every
/// other field is sanitized individually, so one bad value never rejects the
/// whole row.
pub fn parse_leads(value: &Value) -> Vec<LeadRecord> {
    let rows: &[Value] = match value {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => match map.get("leads") {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => {
                warn!("Lead batch object has no 'leads' array");
                &[]
            }
        },
        _ => {
            warn!("Lead batch is neither an array nor an object");
            &[]
        }
    };

    let mut leads = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let Some(row) = row.as_object() else {
            warn!("Skipping lead row {}: not an object", i);
            continue;
        };
        match parse_row(row) {
            Some(lead) => leads.push(lead),
            None => warn!("Skipping lead row {}: missing id", i),
        }
    }

    debug!("Parsed {} of {} lead rows", leads.len(), rows.len());
    leads
}

fn parse_row(row: &Map<String, Value>) -> Option<LeadRecord> {
    let id = lenient_id(row.get("id"))?;
    Some(LeadRecord {
        id,
        name: lenient_string(row.get("name")),
        signals: LeadPriorityInput {
            priority_score: lenient_score(field(row, "priorityScore", "priority_score")),
            priority_bucket: lenient_bucket(field(row, "priorityBucket", "priority_bucket")),
            last_interaction_at: lenient_timestamp(field(
                row,
                "lastInteractionAt",
                "last_interaction_at",
            )),
            created_at: lenient_timestamp(field(row, "createdAt", "created_at")),
            lead_status_id: lenient_id(field(row, "leadStatusId", "lead_status_id")),
            lead_origin_id: lenient_id(field(row, "leadOriginId", "lead_origin_id")),
            has_upcoming_meeting: field(row, "hasUpcomingMeeting", "has_upcoming_meeting")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
    })
}

/// Look up a field by its camelCase key, then its snake_case key.
/// A null camelCase value defers to the snake_case one.
fn field<'a>(row: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    row.get(camel)
        .filter(|v| !v.is_null())
        .or_else(|| row.get(snake))
}

/// Load lead rows from a JSON file
pub fn load_leads(path: &Path) -> Result<Vec<LeadRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read leads file at {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse leads: invalid JSON in {}", path.display()))?;
    Ok(parse_leads(&value))
}

fn lenient_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_string)
}

fn lenient_score(value: Option<&Value>) -> Option<f64> {
    value?.as_f64().filter(|n| n.is_finite())
}

fn lenient_bucket(value: Option<&Value>) -> Option<PriorityBucket> {
    value?.as_str().and_then(PriorityBucket::parse)
}

fn lenient_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value?
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use std::env;

    #[test]
    fn test_camel_and_snake_case_fields() {
        let leads = parse_leads(&json!([
            {
                "id": "a",
                "name": "Acme",
                "priorityScore": 72,
                "lastInteractionAt": "2024-06-01T10:00:00Z",
                "leadStatusId": "qualified",
                "hasUpcomingMeeting": true
            },
            {
                "id": "b",
                "priority_bucket": "warm",
                "created_at": "2024-05-01T00:00:00+02:00",
                "lead_origin_id": "referral"
            }
        ]));
        assert_eq!(leads.len(), 2);

        let a = &leads[0].signals;
        assert_eq!(a.priority_score, Some(72.0));
        assert_eq!(
            a.last_interaction_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(a.lead_status_id.as_deref(), Some("qualified"));
        assert!(a.has_upcoming_meeting);

        let b = &leads[1].signals;
        assert_eq!(b.priority_bucket, Some(PriorityBucket::Warm));
        assert_eq!(
            b.created_at,
            Some(Utc.with_ymd_and_hms(2024, 4, 30, 22, 0, 0).unwrap())
        );
        assert_eq!(b.lead_origin_id.as_deref(), Some("referral"));
        assert_eq!(leads[1].display_name(), "b");
    }

    #[test]
    fn test_mixed_key_styles_keep_row() {
        let leads = parse_leads(&json!([{
            "id": "a",
            "priorityScore": 50,
            "priority_score": 60,
            "createdAt": "2024-06-01T00:00:00Z",
            "created_at": "2023-01-01T00:00:00Z",
            "leadStatusId": null,
            "lead_status_id": "qualified"
        }]));
        assert_eq!(leads.len(), 1);
        let signals = &leads[0].signals;
        assert_eq!(signals.priority_score, Some(50.0));
        assert_eq!(
            signals.created_at,
            Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(signals.lead_status_id.as_deref(), Some("qualified"));
    }

    #[test]
    fn test_bad_values_become_absent() {
        let leads = parse_leads(&json!([{
            "id": "a",
            "name": 7,
            "priorityScore": "90",
            "priorityBucket": "scorching",
            "lastInteractionAt": "yesterday",
            "hasUpcomingMeeting": "yes"
        }]));
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].name, None);
        assert_eq!(leads[0].signals, LeadPriorityInput::default());
    }

    #[test]
    fn test_null_fields_are_absent() {
        let leads = parse_leads(&json!([{
            "id": "a",
            "priorityScore": null,
            "priorityBucket": null,
            "leadStatusId": null
        }]));
        assert_eq!(leads[0].signals, LeadPriorityInput::default());
    }

    #[test]
    fn test_rows_without_id_are_skipped() {
        let leads = parse_leads(&json!([
            { "name": "No id" },
            { "id": "" },
            "not an object",
            { "id": 42 }
        ]));
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, "42");
    }

    #[test]
    fn test_wrapped_leads_object() {
        let leads = parse_leads(&json!({ "leads": [{ "id": "a" }] }));
        assert_eq!(leads.len(), 1);
        assert!(parse_leads(&json!({ "data": [] })).is_empty());
        assert!(parse_leads(&json!(12)).is_empty());
    }

    #[test]
    fn test_load_leads_from_file() {
        let temp_path = env::temp_dir().join("lead_priority_test_leads.json");
        std::fs::write(&temp_path, r#"[{"id": "a", "priorityScore": 50}]"#).unwrap();

        let leads = load_leads(&temp_path).unwrap();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].signals.priority_score, Some(50.0));

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_load_leads_missing_file() {
        let temp_path = env::temp_dir().join("lead_priority_test_missing_leads.json");
        let _ = std::fs::remove_file(&temp_path);
        assert!(load_leads(&temp_path).is_err());
    }
}
