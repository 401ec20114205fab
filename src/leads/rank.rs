use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, info};

use super::record::LeadRecord;
use crate::priority::{
    evaluate_lead_priority, LeadPriorityContext, PriorityBucket, PriorityConfig,
    PriorityEvaluation,
};

/// A lead with its evaluated priority
#[derive(Debug, Clone)]
pub struct RankedLead {
    pub lead: LeadRecord,
    pub evaluation: PriorityEvaluation,
}

impl RankedLead {
    pub fn score(&self) -> f64 {
        self.evaluation.result.score
    }

    pub fn bucket(&self) -> PriorityBucket {
        self.evaluation.result.bucket
    }
}

/// Lead counts per bucket for one ranking run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketSummary {
    pub hot: usize,
    pub warm: usize,
    pub cold: usize,
}

impl BucketSummary {
    fn record(&mut self, bucket: PriorityBucket) {
        match bucket {
            PriorityBucket::Hot => self.hot += 1,
            PriorityBucket::Warm => self.warm += 1,
            PriorityBucket::Cold => self.cold += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.hot + self.warm + self.cold
    }
}

/// Score every lead against the same `now`, then sort by score descending.
///
/// Ties go to the most recently touched lead, then to the smaller id. The
/// summary counts every scored lead; `only` then filters the returned list.
pub fn rank_leads(
    leads: Vec<LeadRecord>,
    config: &PriorityConfig,
    context: &LeadPriorityContext,
    now: DateTime<Utc>,
    only: Option<PriorityBucket>,
) -> (Vec<RankedLead>, BucketSummary) {
    let mut summary = BucketSummary::default();

    let mut ranked: Vec<RankedLead> = leads
        .into_iter()
        .map(|lead| {
            let evaluation = evaluate_lead_priority(&lead.signals, Some(config), Some(context), now);
            debug!(
                "Lead {}: {} ({:?}, score {})",
                lead.id, evaluation.result.bucket, evaluation.breakdown.source, evaluation.result.score
            );
            summary.record(evaluation.result.bucket);
            RankedLead { lead, evaluation }
        })
        .collect();

    info!(
        "Scored {} leads: hot={} warm={} cold={}",
        summary.total(),
        summary.hot,
        summary.warm,
        summary.cold
    );

    if let Some(bucket) = only {
        ranked.retain(|r| r.bucket() == bucket);
    }

    ranked.sort_by(compare_ranked);
    (ranked, summary)
}

fn compare_ranked(a: &RankedLead, b: &RankedLead) -> Ordering {
    // Primary: score descending
    let score_cmp = b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal);
    if score_cmp != Ordering::Equal {
        return score_cmp;
    }
    // Tie-breaker: most recent anchor first, leads without one last
    let anchor_cmp = match (a.lead.signals.recency_anchor(), b.lead.signals.recency_anchor()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    if anchor_cmp != Ordering::Equal {
        return anchor_cmp;
    }
    a.lead.id.cmp(&b.lead.id)
}
