use std::fmt::Write;

use crate::insights::display_name;
use crate::models::AnalyticsResult;

const MAX_ANOMALIES: usize = 10;

pub fn build_report(subject: &str, result: &AnalyticsResult) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Wellness Check-in Report");
    let _ = writeln!(
        output,
        "Generated for {} over the last {}",
        subject, result.timeframe
    );

    if result.degraded {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "> Analytics could not be computed for this window; figures below are empty."
        );
    }

    let summary = &result.summary;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(
        output,
        "{} check-ins, overall average {:.2}, consistency {:.0}%",
        summary.total_entries, summary.overall_average, summary.consistency_score
    );

    if summary.entry_types.is_empty() {
        let _ = writeln!(output, "No check-ins recorded for this window.");
    } else {
        for (entry_type, stats) in summary.entry_types.iter() {
            let _ = writeln!(
                output,
                "- {}: {} check-ins (avg {:.1}, range {:.1}-{:.1}, sd {:.2})",
                display_name(entry_type),
                stats.count,
                stats.average,
                stats.min,
                stats.max,
                stats.std_dev
            );
        }
    }

    let trends = &result.trends;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Trends");
    let _ = writeln!(
        output,
        "Overall: {} (strength {:.2})",
        trends.overall_trend.as_str(),
        trends.trend_strength
    );
    for (entry_type, trend) in trends.periodic_patterns.iter() {
        let _ = writeln!(
            output,
            "- {}: {} (slope {:+.3})",
            display_name(entry_type),
            trend.trend.as_str(),
            trend.slope
        );
    }

    let risk = &result.risk_assessment;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk");
    let _ = writeln!(
        output,
        "Overall risk {} (score {})",
        risk.overall_risk.as_str(),
        risk.risk_score
    );
    for factor in risk.risk_factors.iter() {
        let _ = writeln!(output, "- {}", factor);
    }
    for alert in risk.alerts.iter() {
        let _ = writeln!(output, "- **Alert:** {}", alert);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Anomalies");
    if result.patterns.anomalies.is_empty() {
        let _ = writeln!(output, "No unusual check-ins detected.");
    } else {
        for anomaly in result.patterns.anomalies.iter().take(MAX_ANOMALIES) {
            let _ = writeln!(
                output,
                "- {} {} on {} (expected {:.1}-{:.1}, z {:.2})",
                display_name(&anomaly.entry_type),
                anomaly.value,
                anomaly.timestamp,
                anomaly.expected_range[0],
                anomaly.expected_range[1],
                anomaly.z_score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for insight in result.insights.iter() {
        let _ = writeln!(output, "- {}", insight);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommendations");
    for recommendation in result.recommendations.iter() {
        let _ = writeln!(output, "- {}", recommendation);
    }

    output
}
