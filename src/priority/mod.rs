pub mod config;
pub mod engine;
pub mod types;
pub mod validation;

pub use config::{parse_priority_config, Descriptions, PriorityConfig, ScoringSettings, Thresholds};
pub use engine::{
    bucket_from_score, calculate_lead_priority, evaluate_lead_priority, FactorContribution,
    PriorityEvaluation, ScoreBreakdown, ScoreSource,
};
pub use types::{
    LeadOrigin, LeadPriorityContext, LeadPriorityInput, LeadPriorityResult, LeadStatus,
    PriorityBucket,
};
pub use validation::validate_priority_config;
