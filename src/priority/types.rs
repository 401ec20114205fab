use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority tier assigned to a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBucket {
    Hot,
    Warm,
    Cold,
}

impl PriorityBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityBucket::Hot => "hot",
            PriorityBucket::Warm => "warm",
            PriorityBucket::Cold => "cold",
        }
    }

    /// Strict parse of the three bucket names. Anything else is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "hot" => Some(PriorityBucket::Hot),
            "warm" => Some(PriorityBucket::Warm),
            "cold" => Some(PriorityBucket::Cold),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signals known about a single lead. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPriorityInput {
    /// Score computed upstream (e.g. by a backend job)
    pub priority_score: Option<f64>,
    /// Bucket computed upstream
    pub priority_bucket: Option<PriorityBucket>,
    pub last_interaction_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub lead_status_id: Option<String>,
    pub lead_origin_id: Option<String>,
    pub has_upcoming_meeting: bool,
}

impl LeadPriorityInput {
    /// Timestamp recency is measured from: last interaction, else creation.
    pub fn recency_anchor(&self) -> Option<DateTime<Utc>> {
        self.last_interaction_at.or(self.created_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadStatus {
    pub id: String,
    #[serde(alias = "priorityWeight")]
    pub priority_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadOrigin {
    pub id: String,
    #[serde(alias = "priorityWeight")]
    pub priority_weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Reference tables that map status/origin ids to priority weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPriorityContext {
    pub lead_statuses: Vec<LeadStatus>,
    pub lead_origins: Vec<LeadOrigin>,
}

impl LeadPriorityContext {
    pub fn status_weight(&self, id: &str) -> Option<f64> {
        self.lead_statuses
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.priority_weight)
    }

    pub fn origin_weight(&self, id: &str) -> Option<f64> {
        self.lead_origins
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.priority_weight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadPriorityResult {
    pub bucket: PriorityBucket,
    pub score: f64,
    pub description: String,
}
