pub mod formatter;

pub use formatter::{
    format_bucket, format_json, format_lead_detail, format_ranked_table, format_score,
    format_summary, format_tsv, should_use_colors,
};
