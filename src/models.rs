use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub entry_type: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increasing,
    Decreasing,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryTypeSummary {
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_entries: usize,
    pub entry_types: BTreeMap<String, EntryTypeSummary>,
    pub overall_average: f64,
    pub consistency_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryTrend {
    pub trend: Trend,
    pub direction: Direction,
    pub slope: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendStats {
    pub overall_trend: Trend,
    pub trend_direction: Direction,
    pub trend_strength: f64,
    pub periodic_patterns: BTreeMap<String, EntryTrend>,
}

impl Default for TrendStats {
    fn default() -> Self {
        Self {
            overall_trend: Trend::Stable,
            trend_direction: Direction::Neutral,
            trend_strength: 0.0,
            periodic_patterns: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternBucket {
    pub average: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub entry_type: String,
    pub id: Option<String>,
    pub value: f64,
    pub expected_range: [f64; 2],
    pub z_score: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PatternStats {
    /// Keyed by hour of day, 0-23.
    pub daily_patterns: BTreeMap<u32, PatternBucket>,
    /// Keyed by weekday, 0 = Monday.
    pub weekly_patterns: BTreeMap<u32, PatternBucket>,
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk: RiskLevel,
    pub risk_score: u32,
    pub risk_factors: Vec<String>,
    pub alerts: Vec<String>,
}

impl Default for RiskAssessment {
    fn default() -> Self {
        Self {
            overall_risk: RiskLevel::Low,
            risk_score: 0,
            risk_factors: Vec::new(),
            alerts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub timeframe: String,
    /// Set when the result is the fallback produced after an internal error.
    pub degraded: bool,
    pub summary: SummaryStats,
    pub trends: TrendStats,
    pub patterns: PatternStats,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_assessment: RiskAssessment,
}
