use crate::analytics::GroupedRecords;
use crate::models::{RiskAssessment, RiskLevel};
use crate::stats;

const RECENT_WINDOW: usize = 3;
const MAX_RISK_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Threshold::Above(limit) => value > limit,
            Threshold::Below(limit) => value < limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub entry_type: &'static str,
    pub threshold: Threshold,
    pub points: u32,
    pub factor: &'static str,
    pub alert: Option<&'static str>,
}

pub const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        entry_type: "stress",
        threshold: Threshold::Above(8.0),
        points: 30,
        factor: "High stress levels",
        alert: Some("Consistently high stress levels detected"),
    },
    RiskRule {
        entry_type: "mood",
        threshold: Threshold::Below(3.0),
        points: 25,
        factor: "Low mood",
        alert: Some("Persistently low mood detected"),
    },
    RiskRule {
        entry_type: "energy",
        threshold: Threshold::Below(3.0),
        points: 20,
        factor: "Low energy",
        alert: None,
    },
    RiskRule {
        entry_type: "sleep_quality",
        threshold: Threshold::Below(3.0),
        points: 15,
        factor: "Poor sleep quality",
        alert: None,
    },
];

/// Mean of the last three values of a group, or of all of them when shorter.
pub fn recent_average(values: &[f64]) -> f64 {
    let start = values.len().saturating_sub(RECENT_WINDOW);
    stats::mean(&values[start..])
}

pub fn risk_tier(score: u32) -> RiskLevel {
    match score {
        50.. => RiskLevel::High,
        25..=49 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

pub fn assess_risk(groups: &GroupedRecords<'_>) -> RiskAssessment {
    let mut score = 0u32;
    let mut risk_factors = Vec::new();
    let mut alerts = Vec::new();

    for (entry_type, records) in groups.iter() {
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        let recent_avg = recent_average(&values);

        for rule in RISK_RULES.iter().filter(|rule| rule.entry_type == entry_type) {
            if !rule.threshold.matches(recent_avg) {
                continue;
            }
            score += rule.points;
            risk_factors.push(rule.factor.to_string());
            if let Some(alert) = rule.alert {
                alerts.push(alert.to_string());
            }
        }
    }

    RiskAssessment {
        overall_risk: risk_tier(score),
        risk_score: score.min(MAX_RISK_SCORE),
        risk_factors,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::GroupedRecords;
    use crate::models::CheckInRecord;

    fn record(entry_type: &str, value: f64, day: u32) -> CheckInRecord {
        CheckInRecord {
            id: None,
            entry_type: entry_type.to_string(),
            value,
            created_at: format!("2026-03-{day:02}T09:00:00Z"),
        }
    }

    #[test]
    fn tiers_follow_expected_thresholds() {
        assert_eq!(risk_tier(0), RiskLevel::Low);
        assert_eq!(risk_tier(24), RiskLevel::Low);
        assert_eq!(risk_tier(25), RiskLevel::Medium);
        assert_eq!(risk_tier(49), RiskLevel::Medium);
        assert_eq!(risk_tier(50), RiskLevel::High);
        assert_eq!(risk_tier(130), RiskLevel::High);
    }

    #[test]
    fn recent_average_uses_last_three() {
        assert_eq!(recent_average(&[1.0, 1.0, 9.0, 9.0, 9.0]), 9.0);
        assert_eq!(recent_average(&[2.0, 4.0]), 3.0);
        assert_eq!(recent_average(&[]), 0.0);
    }

    #[test]
    fn high_stress_adds_factor_and_alert() {
        let records = vec![
            record("stress", 9.0, 1),
            record("stress", 9.0, 2),
            record("stress", 9.0, 3),
        ];
        let groups = GroupedRecords::from_records(&records);
        let risk = assess_risk(&groups);
        assert_eq!(risk.risk_score, 30);
        assert_eq!(risk.overall_risk, RiskLevel::Medium);
        assert_eq!(risk.risk_factors, vec!["High stress levels".to_string()]);
        assert_eq!(
            risk.alerts,
            vec!["Consistently high stress levels detected".to_string()]
        );
    }

    #[test]
    fn rules_accumulate_across_entry_types() {
        let records = vec![
            record("mood", 2.0, 1),
            record("energy", 2.0, 1),
            record("sleep_quality", 1.0, 1),
            record("stress", 10.0, 1),
        ];
        let groups = GroupedRecords::from_records(&records);
        let risk = assess_risk(&groups);
        assert_eq!(risk.risk_score, 90);
        assert_eq!(risk.overall_risk, RiskLevel::High);
        assert_eq!(
            risk.risk_factors,
            vec!["Low mood", "Low energy", "Poor sleep quality", "High stress levels"]
        );
        assert_eq!(risk.alerts.len(), 2);
    }

    #[test]
    fn early_lows_do_not_count_once_recent_values_recover() {
        let records = vec![
            record("mood", 1.0, 1),
            record("mood", 1.0, 2),
            record("mood", 6.0, 3),
            record("mood", 6.0, 4),
            record("mood", 6.0, 5),
        ];
        let groups = GroupedRecords::from_records(&records);
        let risk = assess_risk(&groups);
        assert_eq!(risk.risk_score, 0);
        assert!(risk.risk_factors.is_empty());
        assert_eq!(risk.overall_risk, RiskLevel::Low);
    }

    #[test]
    fn unknown_entry_types_carry_no_risk() {
        let records = vec![record("work_life_balance", 0.0, 1)];
        let groups = GroupedRecords::from_records(&records);
        assert_eq!(assess_risk(&groups), RiskAssessment::default());
    }
}
