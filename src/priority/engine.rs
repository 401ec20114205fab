use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::{PriorityConfig, ScoringSettings, Thresholds};
use super::types::{LeadPriorityContext, LeadPriorityInput, LeadPriorityResult, PriorityBucket};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Where the score in a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Upstream score passed through unchanged
    Supplied,
    /// Midpoint of an upstream bucket's range
    BucketMidpoint,
    /// Computed from recency, weights and meeting bonus
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Recency", "Status", "Meeting"
    pub description: String, // e.g. "15 days since anchor, 40 max over 30 days"
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub source: ScoreSource,
    pub factors: Vec<FactorContribution>,
    /// Sum of all factors before clamping (computed scores only)
    pub raw_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityEvaluation {
    pub result: LeadPriorityResult,
    pub breakdown: ScoreBreakdown,
}

/// Calculate bucket, score and description for a lead.
///
/// Precedence: a supplied score wins (bucket derived from it, score returned
/// unclamped); else a supplied bucket is used as-is with its range midpoint as
/// score; else the score is computed from signals and clamped. `now` is the
/// reference instant for recency. A missing or future recency anchor counts
/// as zero elapsed days, so recency never exceeds `recency_max_points`.
/// Never fails.
pub fn calculate_lead_priority(
    input: &LeadPriorityInput,
    config: Option<&PriorityConfig>,
    context: Option<&LeadPriorityContext>,
    now: DateTime<Utc>,
) -> LeadPriorityResult {
    evaluate_lead_priority(input, config, context, now).result
}

/// Same as [`calculate_lead_priority`], also reporting how the score was built.
pub fn evaluate_lead_priority(
    input: &LeadPriorityInput,
    config: Option<&PriorityConfig>,
    context: Option<&LeadPriorityContext>,
    now: DateTime<Utc>,
) -> PriorityEvaluation {
    let default_config;
    let config = match config {
        Some(c) => c,
        None => {
            default_config = PriorityConfig::default();
            &default_config
        }
    };

    if let Some(score) = input.priority_score {
        let bucket = bucket_from_score(score, &config.thresholds);
        return PriorityEvaluation {
            result: build_result(bucket, score, config),
            breakdown: ScoreBreakdown {
                source: ScoreSource::Supplied,
                factors: Vec::new(),
                raw_score: None,
            },
        };
    }

    if let Some(bucket) = input.priority_bucket {
        let score = bucket_midpoint(bucket, config);
        return PriorityEvaluation {
            result: build_result(bucket, score, config),
            breakdown: ScoreBreakdown {
                source: ScoreSource::BucketMidpoint,
                factors: Vec::new(),
                raw_score: None,
            },
        };
    }

    let mut factors = Vec::new();

    let days = days_since(input.recency_anchor(), now);
    let recency = recency_points(days, &config.scoring);
    factors.push(FactorContribution {
        label: "Recency".to_string(),
        description: format!(
            "{} days since last touch, {} max over {} days",
            days, config.scoring.recency_max_points, config.scoring.stale_days
        ),
        points: recency,
    });

    if let Some(ref status_id) = input.lead_status_id {
        if let Some(weight) = context.and_then(|c| c.status_weight(status_id)) {
            factors.push(FactorContribution {
                label: "Status".to_string(),
                description: format!("status '{}'", status_id),
                points: weight,
            });
        }
    }

    if let Some(ref origin_id) = input.lead_origin_id {
        if let Some(weight) = context.and_then(|c| c.origin_weight(origin_id)) {
            factors.push(FactorContribution {
                label: "Origin".to_string(),
                description: format!("origin '{}'", origin_id),
                points: weight,
            });
        }
    }

    if input.has_upcoming_meeting {
        factors.push(FactorContribution {
            label: "Meeting".to_string(),
            description: "upcoming meeting scheduled".to_string(),
            points: config.scoring.upcoming_meeting_points,
        });
    }

    let raw_score: f64 = factors.iter().map(|f| f.points).sum();
    let score = clamp_score(raw_score, &config.scoring);
    let bucket = bucket_from_score(score, &config.thresholds);

    PriorityEvaluation {
        result: build_result(bucket, score, config),
        breakdown: ScoreBreakdown {
            source: ScoreSource::Computed,
            factors,
            raw_score: Some(raw_score),
        },
    }
}

/// Thresholds are inclusive lower bounds: `>= hot` is hot, `>= warm` is warm.
pub fn bucket_from_score(score: f64, thresholds: &Thresholds) -> PriorityBucket {
    if score >= thresholds.hot {
        PriorityBucket::Hot
    } else if score >= thresholds.warm {
        PriorityBucket::Warm
    } else {
        PriorityBucket::Cold
    }
}

/// Representative score for a bucket: the midpoint of its range.
pub fn bucket_midpoint(bucket: PriorityBucket, config: &PriorityConfig) -> f64 {
    let t = &config.thresholds;
    let s = &config.scoring;
    match bucket {
        PriorityBucket::Hot => (t.hot + s.max_score) / 2.0,
        PriorityBucket::Warm => (t.warm + t.hot) / 2.0,
        PriorityBucket::Cold => (s.min_score + t.warm) / 2.0,
    }
}

/// Whole days elapsed since `anchor`, floored. No anchor or a future anchor counts as 0.
fn days_since(anchor: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match anchor {
        Some(anchor) => (now - anchor)
            .num_milliseconds()
            .div_euclid(MILLIS_PER_DAY)
            .max(0),
        None => 0,
    }
}

fn recency_points(days: i64, scoring: &ScoringSettings) -> f64 {
    // A non-positive window has no decay range to spread points over
    if scoring.stale_days.is_nan() || scoring.stale_days <= 0.0 {
        return 0.0;
    }
    let points = scoring.recency_max_points * (1.0 - days as f64 / scoring.stale_days);
    points.max(0.0)
}

fn clamp_score(score: f64, scoring: &ScoringSettings) -> f64 {
    // f64::clamp panics when min > max, and a settings value can say exactly that
    score.max(scoring.min_score).min(scoring.max_score)
}

fn build_result(bucket: PriorityBucket, score: f64, config: &PriorityConfig) -> LeadPriorityResult {
    LeadPriorityResult {
        bucket,
        score,
        description: config.descriptions.for_bucket(bucket).to_string(),
    }
}
