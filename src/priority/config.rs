use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::PriorityBucket;

/// Fully populated lead priority configuration.
///
/// The JSON/YAML shape mirrors the `lead_priority_config` settings value:
/// ```yaml
/// thresholds:
///   hot: 70
///   warm: 40
/// scoring:
///   recencyMaxPoints: 40
///   staleDays: 30
///   upcomingMeetingPoints: 10
///   minScore: 0
///   maxScore: 100
/// descriptions:
///   hot: "..."
///   warm: "..."
///   cold: "..."
/// ```
///
/// Raw settings values should go through [`parse_priority_config`], which never
/// fails and fills every missing or mistyped field from [`PriorityConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityConfig {
    pub thresholds: Thresholds,
    pub scoring: ScoringSettings,
    pub descriptions: Descriptions,
}

/// Inclusive lower bounds of the hot and warm tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub hot: f64,
    pub warm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSettings {
    /// Points for an interaction that happened today
    pub recency_max_points: f64,
    /// Days over which recency points decay linearly to zero
    pub stale_days: f64,
    /// Bonus when a meeting is scheduled
    pub upcoming_meeting_points: f64,
    pub min_score: f64,
    pub max_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptions {
    pub hot: String,
    pub warm: String,
    pub cold: String,
}

impl Descriptions {
    pub fn for_bucket(&self, bucket: PriorityBucket) -> &str {
        match bucket {
            PriorityBucket::Hot => &self.hot,
            PriorityBucket::Warm => &self.warm,
            PriorityBucket::Cold => &self.cold,
        }
    }
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds {
                hot: 70.0,
                warm: 40.0,
            },
            scoring: ScoringSettings {
                recency_max_points: 40.0,
                stale_days: 30.0,
                upcoming_meeting_points: 10.0,
                min_score: 0.0,
                max_score: 100.0,
            },
            descriptions: Descriptions {
                hot: "Hot lead - recent interaction, high likelihood of conversion".to_string(),
                warm: "Warm lead - needs follow-up".to_string(),
                cold: "Cold lead - no recent interaction".to_string(),
            },
        }
    }
}

/// Parse a loosely-typed settings value into a complete [`PriorityConfig`].
///
/// Non-object input (null, numbers, strings, booleans, arrays) yields the
/// default config. Otherwise each leaf is taken from the input only when it
/// has the right JSON type, and falls back to its default independently.
pub fn parse_priority_config(raw: &Value) -> PriorityConfig {
    let defaults = PriorityConfig::default();

    if !raw.is_object() {
        return defaults;
    }

    let thresholds = raw.get("thresholds");
    let scoring = raw.get("scoring");
    let descriptions = raw.get("descriptions");

    PriorityConfig {
        thresholds: Thresholds {
            hot: number_or(thresholds, "hot", defaults.thresholds.hot),
            warm: number_or(thresholds, "warm", defaults.thresholds.warm),
        },
        scoring: ScoringSettings {
            recency_max_points: number_or(
                scoring,
                "recencyMaxPoints",
                defaults.scoring.recency_max_points,
            ),
            stale_days: number_or(scoring, "staleDays", defaults.scoring.stale_days),
            upcoming_meeting_points: number_or(
                scoring,
                "upcomingMeetingPoints",
                defaults.scoring.upcoming_meeting_points,
            ),
            min_score: number_or(scoring, "minScore", defaults.scoring.min_score),
            max_score: number_or(scoring, "maxScore", defaults.scoring.max_score),
        },
        descriptions: Descriptions {
            hot: string_or(descriptions, "hot", defaults.descriptions.hot),
            warm: string_or(descriptions, "warm", defaults.descriptions.warm),
            cold: string_or(descriptions, "cold", defaults.descriptions.cold),
        },
    }
}

fn number_or(section: Option<&Value>, key: &str, default: f64) -> f64 {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(default)
}

fn string_or(section: Option<&Value>, key: &str, default: String) -> String {
    section
        .and_then(|s| s.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_returns_defaults() {
        let config = parse_priority_config(&Value::Null);
        assert_eq!(config.thresholds.hot, 70.0);
        assert_eq!(config.thresholds.warm, 40.0);
        assert_eq!(config.scoring.recency_max_points, 40.0);
        assert_eq!(config.scoring.stale_days, 30.0);
        assert_eq!(config.scoring.upcoming_meeting_points, 10.0);
        assert_eq!(config.scoring.min_score, 0.0);
        assert_eq!(config.scoring.max_score, 100.0);
    }

    #[test]
    fn test_non_object_returns_defaults() {
        let defaults = parse_priority_config(&Value::Null);
        assert_eq!(parse_priority_config(&json!(123)), defaults);
        assert_eq!(parse_priority_config(&json!("str")), defaults);
        assert_eq!(parse_priority_config(&json!(true)), defaults);
        assert_eq!(parse_priority_config(&json!([1, 2, 3])), defaults);
        assert_eq!(defaults, PriorityConfig::default());
    }

    #[test]
    fn test_custom_thresholds() {
        let config = parse_priority_config(&json!({
            "thresholds": { "hot": 75, "warm": 55 }
        }));
        assert_eq!(config.thresholds.hot, 75.0);
        assert_eq!(config.thresholds.warm, 55.0);
        // Untouched sections keep their defaults
        assert_eq!(config.scoring, PriorityConfig::default().scoring);
    }

    #[test]
    fn test_custom_scoring() {
        let config = parse_priority_config(&json!({
            "scoring": {
                "recencyMaxPoints": 50,
                "staleDays": 45,
                "upcomingMeetingPoints": 15,
                "minScore": 10,
                "maxScore": 90
            }
        }));
        assert_eq!(config.scoring.recency_max_points, 50.0);
        assert_eq!(config.scoring.stale_days, 45.0);
        assert_eq!(config.scoring.upcoming_meeting_points, 15.0);
        assert_eq!(config.scoring.min_score, 10.0);
        assert_eq!(config.scoring.max_score, 90.0);
    }

    #[test]
    fn test_custom_descriptions() {
        let config = parse_priority_config(&json!({
            "descriptions": { "hot": "Custom hot", "warm": "Custom warm", "cold": "Custom cold" }
        }));
        assert_eq!(config.descriptions.hot, "Custom hot");
        assert_eq!(config.descriptions.warm, "Custom warm");
        assert_eq!(config.descriptions.cold, "Custom cold");
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let config = parse_priority_config(&json!({
            "thresholds": { "hot": "x", "warm": null },
            "scoring": { "staleDays": { "value": 10 }, "maxScore": [100] },
            "descriptions": { "hot": 42, "warm": "Custom warm" }
        }));
        assert_eq!(config.thresholds.hot, 70.0);
        assert_eq!(config.thresholds.warm, 40.0);
        assert_eq!(config.scoring.stale_days, 30.0);
        assert_eq!(config.scoring.max_score, 100.0);
        assert_eq!(config.descriptions.hot, PriorityConfig::default().descriptions.hot);
        assert_eq!(config.descriptions.warm, "Custom warm");
    }

    #[test]
    fn test_partial_override_single_field() {
        let config = parse_priority_config(&json!({ "thresholds": { "hot": 80 } }));
        assert_eq!(config.thresholds.hot, 80.0);
        assert_eq!(config.thresholds.warm, 40.0);
    }

    #[test]
    fn test_section_of_wrong_type_is_ignored() {
        let config = parse_priority_config(&json!({ "thresholds": "hot", "scoring": 5 }));
        assert_eq!(config, PriorityConfig::default());
    }

    #[test]
    fn test_serialized_shape_matches_settings_keys() {
        let value = serde_json::to_value(PriorityConfig::default()).unwrap();
        assert_eq!(value["scoring"]["recencyMaxPoints"], json!(40.0));
        assert_eq!(value["thresholds"]["hot"], json!(70.0));
        // Serialized defaults parse back to the same config
        assert_eq!(parse_priority_config(&value), PriorityConfig::default());
    }
}
