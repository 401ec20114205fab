pub mod rank;
pub mod record;

pub use rank::{rank_leads, BucketSummary, RankedLead};
pub use record::{load_leads, parse_leads, LeadRecord};
