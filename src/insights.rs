//! Rule-based free-text insights and recommendations.

use crate::analytics::GroupedRecords;
use crate::models::SummaryStats;
use crate::risk::Threshold;
use crate::stats;

const MAX_ITEMS: usize = 5;
const RECENT_WINDOW: usize = 3;
const SHIFT_MARGIN: f64 = 1.0;

pub const NO_DATA_INSIGHT: &str = "No wellness data available yet. Start tracking to get insights.";
pub const NO_DATA_RECOMMENDATION: &str =
    "Start by checking in on your mood, stress and energy once a day to build a baseline.";

const LOW_CONSISTENCY: &str =
    "Your check-ins have been irregular. Tracking more often makes patterns easier to spot.";
const HIGH_CONSISTENCY: &str =
    "Great job staying consistent with your check-ins! Regular tracking gives the clearest picture.";
const CONSISTENT_TIMES: &str =
    "Try checking in at consistent times each day to make trends easier to compare.";

const FALLBACK_RECOMMENDATIONS: [&str; 2] = [
    "Keep up your daily check-ins to unlock more personalised recommendations.",
    "Set aside a few minutes each day for a mindfulness or journaling practice.",
];

#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    pub entry_type: &'static str,
    pub threshold: Threshold,
    pub message: &'static str,
}

pub const RECOMMENDATION_RULES: &[RecommendationRule] = &[
    RecommendationRule {
        entry_type: "stress",
        threshold: Threshold::Above(7.0),
        message: "Your stress has been running high. Try short breathing exercises, \
                  regular breaks or a walk to help manage it.",
    },
    RecommendationRule {
        entry_type: "energy",
        threshold: Threshold::Below(4.0),
        message: "Your energy has been low. Prioritise regular sleep and some light \
                  exercise during the day.",
    },
    RecommendationRule {
        entry_type: "sleep_quality",
        threshold: Threshold::Below(4.0),
        message: "Your sleep quality could improve. A consistent, screen-free bedtime \
                  routine can help.",
    },
    RecommendationRule {
        entry_type: "work_life_balance",
        threshold: Threshold::Below(4.0),
        message: "Your work-life balance looks strained. Consider setting clearer \
                  boundaries around work hours.",
    },
];

pub(crate) fn display_name(entry_type: &str) -> String {
    entry_type.replace('_', " ")
}

pub fn generate_insights(groups: &GroupedRecords<'_>, summary: &SummaryStats) -> Vec<String> {
    if groups.is_empty() {
        return vec![NO_DATA_INSIGHT.to_string()];
    }

    let mut insights = Vec::new();

    if summary.consistency_score < 50.0 {
        insights.push(LOW_CONSISTENCY.to_string());
    } else if summary.consistency_score > 80.0 {
        insights.push(HIGH_CONSISTENCY.to_string());
    }

    for (entry_type, records) in groups.iter() {
        if records.len() < RECENT_WINDOW {
            continue;
        }
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        let overall = stats::mean(&values);
        let recent = stats::mean(&values[values.len() - RECENT_WINDOW..]);
        let name = display_name(entry_type);

        if recent > overall + SHIFT_MARGIN {
            insights.push(format!(
                "Your {name} has been improving recently compared to your overall average."
            ));
        } else if recent < overall - SHIFT_MARGIN {
            insights.push(format!(
                "Your {name} has dipped recently compared to your overall average."
            ));
        }
    }

    if insights.len() < 3 {
        insights.push(CONSISTENT_TIMES.to_string());
    }

    insights.truncate(MAX_ITEMS);
    insights
}

pub fn generate_recommendations(groups: &GroupedRecords<'_>) -> Vec<String> {
    if groups.is_empty() {
        return vec![NO_DATA_RECOMMENDATION.to_string()];
    }

    let mut recommendations = Vec::new();

    for (entry_type, records) in groups.iter() {
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();
        let average = stats::mean(&values);
        for rule in RECOMMENDATION_RULES
            .iter()
            .filter(|rule| rule.entry_type == entry_type)
        {
            if rule.threshold.matches(average) {
                recommendations.push(rule.message.to_string());
            }
        }
    }

    if recommendations.len() < 3 {
        recommendations.extend(FALLBACK_RECOMMENDATIONS.iter().map(|s| s.to_string()));
    }

    recommendations.truncate(MAX_ITEMS);
    recommendations
}
