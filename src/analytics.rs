//! Wellness analytics over a user's check-ins.
//!
//! [`WellnessAnalytics`] turns a list of check-ins into summary statistics, trend and
//! anomaly detection, free-text insights and recommendations, and a rule-based risk
//! score. Every call is independent: nothing is cached between calls and no I/O is
//! performed.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Timelike};

use crate::error::AnalyticsOutcome;
use crate::insights::{self, NO_DATA_INSIGHT, NO_DATA_RECOMMENDATION};
use crate::models::{
    AnalyticsResult, Anomaly, CheckInRecord, Direction, EntryTrend, EntryTypeSummary,
    PatternBucket, PatternStats, RiskAssessment, SummaryStats, Trend, TrendStats,
};
use crate::risk;
use crate::stats;

const TREND_MIN_RECORDS: usize = 3;
const ANOMALY_MIN_RECORDS: usize = 5;
const ANOMALY_Z_THRESHOLD: f64 = 2.0;
const SLOPE_THRESHOLD: f64 = 0.1;
const CONSISTENCY_WINDOW_DAYS: f64 = 30.0;

/// Check-ins partitioned by entry type, in order of first appearance.
#[derive(Debug, Default)]
pub struct GroupedRecords<'a> {
    groups: Vec<(&'a str, Vec<&'a CheckInRecord>)>,
}

impl<'a> GroupedRecords<'a> {
    pub fn from_records(records: &'a [CheckInRecord]) -> Self {
        let mut groups: Vec<(&'a str, Vec<&'a CheckInRecord>)> = Vec::new();
        let mut slots: HashMap<&'a str, usize> = HashMap::new();

        for record in records {
            let slot = *slots.entry(record.entry_type.as_str()).or_insert_with(|| {
                groups.push((record.entry_type.as_str(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record);
        }

        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a CheckInRecord])> + '_ {
        self.groups
            .iter()
            .map(|(entry_type, records)| (*entry_type, records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.groups.iter().map(|(_, records)| records.len()).sum()
    }
}

fn values_of(records: &[&CheckInRecord]) -> Vec<f64> {
    records.iter().map(|r| r.value).collect()
}

fn classify_slope(slope: f64) -> EntryTrend {
    let (trend, direction) = if slope > SLOPE_THRESHOLD {
        (Trend::Improving, Direction::Increasing)
    } else if slope < -SLOPE_THRESHOLD {
        (Trend::Declining, Direction::Decreasing)
    } else {
        (Trend::Stable, Direction::Neutral)
    };

    EntryTrend {
        trend,
        direction,
        slope,
        strength: stats::round_to((slope.abs() * 10.0).min(1.0), 2),
    }
}

fn into_buckets(sums: BTreeMap<u32, (f64, usize)>) -> BTreeMap<u32, PatternBucket> {
    sums.into_iter()
        .map(|(key, (sum, count))| {
            let average = if count == 0 { 0.0 } else { sum / count as f64 };
            (key, PatternBucket { average, count })
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WellnessAnalytics;

impl WellnessAnalytics {
    pub fn new() -> Self {
        Self
    }

    /// Computes analytics for `entries`, degrading to the empty result on any error.
    ///
    /// `timeframe` is a display label only; callers filter by date beforehand.
    pub fn generate_user_analytics(
        &self,
        entries: &[CheckInRecord],
        timeframe: &str,
    ) -> AnalyticsResult {
        match self.try_generate(entries, timeframe) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    timeframe,
                    entries = entries.len(),
                    "wellness analytics failed, returning empty result"
                );
                let mut fallback = self.empty_result(timeframe);
                fallback.degraded = true;
                fallback
            }
        }
    }

    pub fn try_generate(
        &self,
        entries: &[CheckInRecord],
        timeframe: &str,
    ) -> AnalyticsOutcome<AnalyticsResult> {
        if entries.is_empty() {
            return Ok(self.empty_result(timeframe));
        }

        let groups = GroupedRecords::from_records(entries);
        let summary = self.summary_stats(&groups);
        let trends = self.trend_stats(&groups)?;
        let patterns = self.pattern_stats(&groups)?;
        let insights = insights::generate_insights(&groups, &summary);
        let recommendations = insights::generate_recommendations(&groups);
        let risk_assessment = risk::assess_risk(&groups);

        tracing::debug!(
            entries = entries.len(),
            entry_types = groups.len(),
            timeframe,
            risk = risk_assessment.overall_risk.as_str(),
            "computed wellness analytics"
        );

        Ok(AnalyticsResult {
            timeframe: timeframe.to_string(),
            degraded: false,
            summary,
            trends,
            patterns,
            insights,
            recommendations,
            risk_assessment,
        })
    }

    pub fn summary_stats(&self, groups: &GroupedRecords<'_>) -> SummaryStats {
        let mut entry_types = BTreeMap::new();
        let mut total_value = 0.0;

        for (entry_type, records) in groups.iter() {
            let values = values_of(records);
            total_value += values.iter().sum::<f64>();
            entry_types.insert(
                entry_type.to_string(),
                EntryTypeSummary {
                    count: values.len(),
                    average: stats::round_to(stats::mean(&values), 2),
                    min: values.iter().cloned().fold(f64::INFINITY, f64::min),
                    max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                    std_dev: stats::round_to(stats::std_dev(&values), 2),
                },
            );
        }

        let total_entries = groups.total_records();
        let overall_average = if total_entries == 0 {
            0.0
        } else {
            stats::round_to(total_value / total_entries as f64, 2)
        };

        SummaryStats {
            total_entries,
            entry_types,
            overall_average,
            consistency_score: self.consistency_score(groups),
        }
    }

    /// Share of a fixed 30-day window with at least one check-in, as a percentage.
    pub fn consistency_score(&self, groups: &GroupedRecords<'_>) -> f64 {
        let days: HashSet<String> = groups
            .iter()
            .flat_map(|(_, records)| records.iter().map(|r| stats::date_prefix(&r.created_at)))
            .collect();

        if days.is_empty() {
            return 0.0;
        }

        (days.len() as f64 / CONSISTENCY_WINDOW_DAYS * 100.0).min(100.0)
    }

    pub fn trend_stats(&self, groups: &GroupedRecords<'_>) -> AnalyticsOutcome<TrendStats> {
        let mut trends = TrendStats::default();

        for (entry_type, records) in groups.iter() {
            if records.len() < TREND_MIN_RECORDS {
                continue;
            }

            let mut dated = records
                .iter()
                .map(|r| stats::parse_timestamp(&r.created_at).map(|at| (at, r.value)))
                .collect::<AnalyticsOutcome<Vec<_>>>()?;
            dated.sort_by(|a, b| a.0.cmp(&b.0));

            let values: Vec<f64> = dated.into_iter().map(|(_, value)| value).collect();
            trends
                .periodic_patterns
                .insert(entry_type.to_string(), classify_slope(stats::linear_slope(&values)));
        }

        let combined: Vec<f64> = groups
            .iter()
            .flat_map(|(_, records)| records.iter().map(|r| r.value))
            .collect();

        if combined.len() >= TREND_MIN_RECORDS {
            let overall = classify_slope(stats::linear_slope(&combined));
            trends.overall_trend = overall.trend;
            trends.trend_direction = overall.direction;
            trends.trend_strength = overall.strength;
        }

        Ok(trends)
    }

    pub fn pattern_stats(&self, groups: &GroupedRecords<'_>) -> AnalyticsOutcome<PatternStats> {
        let mut hourly: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
        let mut weekly: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

        for (_, records) in groups.iter() {
            for record in records {
                let at = stats::parse_timestamp(&record.created_at)?;

                let hour = hourly.entry(at.hour()).or_insert((0.0, 0));
                hour.0 += record.value;
                hour.1 += 1;

                let weekday = weekly
                    .entry(at.weekday().num_days_from_monday())
                    .or_insert((0.0, 0));
                weekday.0 += record.value;
                weekday.1 += 1;
            }
        }

        Ok(PatternStats {
            daily_patterns: into_buckets(hourly),
            weekly_patterns: into_buckets(weekly),
            anomalies: self.detect_anomalies(groups),
        })
    }

    /// Flags check-ins more than two standard deviations from their group mean.
    pub fn detect_anomalies(&self, groups: &GroupedRecords<'_>) -> Vec<Anomaly> {
        let mut anomalies = Vec::new();

        for (entry_type, records) in groups.iter() {
            if records.len() < ANOMALY_MIN_RECORDS {
                continue;
            }

            let values = values_of(records);
            let mean = stats::mean(&values);
            let std = stats::std_dev(&values);
            let band = ANOMALY_Z_THRESHOLD * std;

            for record in records {
                let z = if std > 0.0 {
                    (record.value - mean).abs() / std
                } else {
                    0.0
                };
                if z <= ANOMALY_Z_THRESHOLD {
                    continue;
                }
                anomalies.push(Anomaly {
                    entry_type: entry_type.to_string(),
                    id: record.id.clone(),
                    value: record.value,
                    expected_range: [
                        stats::round_to(mean - band, 1),
                        stats::round_to(mean + band, 1),
                    ],
                    z_score: stats::round_to(z, 2),
                    timestamp: record.created_at.clone(),
                });
            }
        }

        anomalies
    }

    /// The canonical result for a user with no check-ins.
    pub fn empty_result(&self, timeframe: &str) -> AnalyticsResult {
        AnalyticsResult {
            timeframe: timeframe.to_string(),
            degraded: false,
            summary: SummaryStats::default(),
            trends: TrendStats::default(),
            patterns: PatternStats::default(),
            insights: vec![NO_DATA_INSIGHT.to_string()],
            recommendations: vec![NO_DATA_RECOMMENDATION.to_string()],
            risk_assessment: RiskAssessment::default(),
        }
    }
}
