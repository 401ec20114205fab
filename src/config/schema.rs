use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::priority::{
    parse_priority_config, LeadOrigin, LeadPriorityContext, LeadStatus, PriorityConfig,
};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Raw settings value; sanitized by `parse_priority_config`, never rejected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_priority_config: Option<Value>,
    #[serde(default)]
    pub lead_statuses: Vec<LeadStatus>,
    #[serde(default)]
    pub lead_origins: Vec<LeadOrigin>,
}

impl Config {
    /// Effective, fully populated priority configuration
    pub fn priority_config(&self) -> PriorityConfig {
        parse_priority_config(self.lead_priority_config.as_ref().unwrap_or(&Value::Null))
    }

    pub fn priority_context(&self) -> LeadPriorityContext {
        LeadPriorityContext {
            lead_statuses: self.lead_statuses.clone(),
            lead_origins: self.lead_origins.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_settings_value_uses_defaults() {
        let config = Config::default();
        assert_eq!(config.priority_config(), PriorityConfig::default());
        assert!(config.priority_context().lead_statuses.is_empty());
    }

    #[test]
    fn test_settings_value_is_parsed_leniently() {
        let config = Config {
            lead_priority_config: Some(json!({ "thresholds": { "hot": 75, "warm": "55" } })),
            ..Default::default()
        };
        let priority = config.priority_config();
        assert_eq!(priority.thresholds.hot, 75.0);
        assert_eq!(priority.thresholds.warm, 40.0);
    }

    #[test]
    fn test_yaml_config() {
        let yaml = r#"
lead_priority_config:
  thresholds:
    hot: 80
  scoring:
    staleDays: 14
lead_statuses:
  - id: qualified
    priority_weight: 20
    label: Qualified
lead_origins:
  - id: referral
    priorityWeight: 15
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let priority = config.priority_config();
        assert_eq!(priority.thresholds.hot, 80.0);
        assert_eq!(priority.scoring.stale_days, 14.0);

        let context = config.priority_context();
        assert_eq!(context.status_weight("qualified"), Some(20.0));
        assert_eq!(context.origin_weight("referral"), Some(15.0));
    }
}
