use super::config::PriorityConfig;

/// Validate a resolved priority configuration.
/// Returns all validation errors at once (not just the first).
///
/// Scoring does not depend on this passing; an invalid config still scores.
pub fn validate_priority_config(config: &PriorityConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let t = &config.thresholds;
    let s = &config.scoring;

    // Thresholds
    if t.hot <= t.warm {
        errors.push(format!(
            "thresholds.hot: must be greater than thresholds.warm ({} <= {})",
            t.hot, t.warm
        ));
    }
    if t.hot < 0.0 || t.warm < 0.0 {
        errors.push("thresholds: must be non-negative".to_string());
    }
    if t.hot > 100.0 || t.warm > 100.0 {
        errors.push("thresholds: must not exceed 100".to_string());
    }

    // Scoring
    if !(0.0..=100.0).contains(&s.recency_max_points) {
        errors.push(format!(
            "scoring.recencyMaxPoints: must be between 0 and 100 (got {})",
            s.recency_max_points
        ));
    }
    if s.stale_days.is_nan() || s.stale_days <= 0.0 {
        errors.push(format!(
            "scoring.staleDays: must be positive (got {})",
            s.stale_days
        ));
    }
    if !(0.0..=100.0).contains(&s.upcoming_meeting_points) {
        errors.push(format!(
            "scoring.upcomingMeetingPoints: must be between 0 and 100 (got {})",
            s.upcoming_meeting_points
        ));
    }
    if s.min_score < 0.0 || s.max_score < 0.0 {
        errors.push("scoring.minScore/maxScore: must be non-negative".to_string());
    }
    if s.min_score >= s.max_score {
        errors.push(format!(
            "scoring.minScore: must be less than scoring.maxScore ({} >= {})",
            s.min_score, s.max_score
        ));
    }

    // Descriptions
    let descriptions = [
        ("hot", &config.descriptions.hot),
        ("warm", &config.descriptions.warm),
        ("cold", &config.descriptions.cold),
    ];
    for (bucket, text) in descriptions {
        if text.trim().is_empty() {
            errors.push(format!("descriptions.{}: must not be blank", bucket));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_priority_config(&PriorityConfig::default()).is_ok());
    }

    #[test]
    fn test_warm_not_below_hot() {
        let mut config = PriorityConfig::default();
        config.thresholds.warm = 70.0;
        let errors = validate_priority_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("thresholds.hot"));
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut config = PriorityConfig::default();
        config.thresholds.hot = 120.0;
        let errors = validate_priority_config(&config).unwrap_err();
        assert!(errors[0].contains("must not exceed 100"));
    }

    #[test]
    fn test_negative_threshold() {
        let mut config = PriorityConfig::default();
        config.thresholds.warm = -5.0;
        let errors = validate_priority_config(&config).unwrap_err();
        assert!(errors[0].contains("non-negative"));
    }

    #[test]
    fn test_non_positive_stale_days() {
        let mut config = PriorityConfig::default();
        config.scoring.stale_days = 0.0;
        let errors = validate_priority_config(&config).unwrap_err();
        assert!(errors[0].contains("scoring.staleDays"));
    }

    #[test]
    fn test_min_score_not_below_max() {
        let mut config = PriorityConfig::default();
        config.scoring.min_score = 100.0;
        let errors = validate_priority_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.minScore"));
    }

    #[test]
    fn test_blank_description() {
        let mut config = PriorityConfig::default();
        config.descriptions.cold = "   ".to_string();
        let errors = validate_priority_config(&config).unwrap_err();
        assert_eq!(errors, vec!["descriptions.cold: must not be blank".to_string()]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = PriorityConfig::default();
        config.thresholds.warm = 80.0; // Error 1
        config.scoring.recency_max_points = 150.0; // Error 2
        config.scoring.upcoming_meeting_points = -1.0; // Error 3
        config.descriptions.hot = String::new(); // Error 4
        let errors = validate_priority_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
