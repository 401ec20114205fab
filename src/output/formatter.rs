use std::io::IsTerminal;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{Width, terminal_size};

use crate::leads::{BucketSummary, RankedLead};
use crate::priority::{PriorityBucket, ScoreSource};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with at most one decimal, dropping a trailing ".0" (85, 55.5, -10)
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    match formatted.strip_suffix(".0") {
        Some(whole) if whole == "-0" => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Bucket label padded to a fixed 4-char column, colored like the priority badge
pub fn format_bucket(bucket: PriorityBucket, use_colors: bool) -> String {
    paint_bucket(bucket, &format!("{:<4}", bucket.as_str()), use_colors)
}

fn paint_bucket(bucket: PriorityBucket, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match bucket {
        PriorityBucket::Hot => text.red().bold().to_string(),
        PriorityBucket::Warm => text.yellow().to_string(),
        PriorityBucket::Cold => text.blue().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

const INDEX_WIDTH: usize = 3;
const SCORE_WIDTH: usize = 6;
const BUCKET_WIDTH: usize = 4;
const TABLE_SEPARATOR: &str = "  ";

/// Columns a table row spends on everything but the name, in chars
fn fixed_width(id_suffix: &str) -> usize {
    INDEX_WIDTH
        + 1
        + SCORE_WIDTH
        + BUCKET_WIDTH
        + TABLE_SEPARATOR.len() * 2
        + id_suffix.chars().count()
}

/// Fit name into what remains of the terminal after `fixed_width` columns
fn fit_name(name: &str, fixed_width: usize, term_width: Option<usize>) -> String {
    match term_width {
        Some(width) if width > fixed_width + 10 => truncate_name(name, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_name(name, 20),
        // No terminal (pipe), don't truncate
        None => name.to_string(),
    }
}

/// Format ranked leads as a table with columns: Index, Score, Bucket, Name, Id
/// No headers. Score column is right-aligned, 6 chars wide (fits "-100.5").
pub fn format_ranked_table(leads: &[RankedLead], use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads found.".to_string();
    }

    let term_width = get_terminal_width();
    let separator = TABLE_SEPARATOR;

    leads
        .iter()
        .enumerate()
        .map(|(idx, ranked)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded =
                format!("{:>width$}", format_score(ranked.score()), width = SCORE_WIDTH);
            let bucket_str = format_bucket(ranked.bucket(), use_colors);

            // Id column only when the name is not already the id
            let id_suffix = match ranked.lead.name {
                Some(_) => format!("{}({})", separator, ranked.lead.id),
                None => String::new(),
            };

            let name = fit_name(ranked.lead.display_name(), fixed_width(&id_suffix), term_width);

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    bucket_str,
                    separator,
                    name,
                    id_suffix.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}",
                    index_str, score_padded, separator, bucket_str, separator, name, id_suffix
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format ranked leads as tab-separated values for scripting
/// Columns: score, bucket, id, name (no headers, no colors)
pub fn format_tsv(leads: &[RankedLead]) -> String {
    leads
        .iter()
        .map(|ranked| {
            format!(
                "{}\t{}\t{}\t{}",
                format_score(ranked.score()),
                ranked.bucket(),
                ranked.lead.id,
                ranked.lead.name.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonLead<'a> {
    id: &'a str,
    name: Option<&'a str>,
    bucket: PriorityBucket,
    score: f64,
    description: &'a str,
}

/// Format ranked leads as a pretty-printed JSON array
pub fn format_json(leads: &[RankedLead]) -> Result<String> {
    let rows: Vec<JsonLead> = leads
        .iter()
        .map(|ranked| JsonLead {
            id: &ranked.lead.id,
            name: ranked.lead.name.as_deref(),
            bucket: ranked.bucket(),
            score: ranked.score(),
            description: &ranked.evaluation.result.description,
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("Failed to serialize leads as JSON")
}

/// One-line bucket summary, e.g. "3 leads: 1 hot, 1 warm, 1 cold"
pub fn format_summary(summary: &BucketSummary) -> String {
    format!(
        "{} leads: {} hot, {} warm, {} cold",
        summary.total(),
        summary.hot,
        summary.warm,
        summary.cold
    )
}

/// Multi-line explanation of how a lead's priority was reached
pub fn format_lead_detail(ranked: &RankedLead, use_colors: bool) -> String {
    let result = &ranked.evaluation.result;
    let breakdown = &ranked.evaluation.breakdown;

    let title = if use_colors {
        ranked.lead.display_name().bold().to_string()
    } else {
        ranked.lead.display_name().to_string()
    };

    let mut lines = vec![
        title,
        format!("  Id: {}", ranked.lead.id),
        format!(
            "  Priority: {} (score {})",
            paint_bucket(result.bucket, result.bucket.as_str(), use_colors),
            format_score(result.score)
        ),
        format!("  Description: {}", result.description),
    ];

    match breakdown.source {
        ScoreSource::Supplied => lines.push("  Source: supplied score".to_string()),
        ScoreSource::BucketMidpoint => {
            lines.push("  Source: supplied bucket (score is the range midpoint)".to_string())
        }
        ScoreSource::Computed => {
            lines.push("  Source: computed".to_string());
            for factor in &breakdown.factors {
                lines.push(format!(
                    "    {:<8} {:>6}  {}",
                    factor.label,
                    format!("{:+}", factor.points),
                    factor.description
                ));
            }
            if let Some(raw) = breakdown.raw_score {
                if raw != result.score {
                    lines.push(format!(
                        "    Raw total {} clamped to {}",
                        format_score(raw),
                        format_score(result.score)
                    ));
                }
            }
        }
    }

    lines.join("\n")
}
