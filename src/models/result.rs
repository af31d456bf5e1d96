use super::attendance::{DailyRecord, Layout};
use super::month::MonthLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Deduction line for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionLine {
    pub session_id: String,
    pub session_name: String,
    pub required_hours: f64,
    pub credited_hours: f64,
    pub deficit_hours: f64,
    pub attendance_percent: f64,
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BonusSource {
    Punctuality,
    General,
}

/// Bonus line. A cancelled punctuality bonus keeps its line with a zero amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusLine {
    pub source: BonusSource,
    pub name: String,
    pub count: f64,
    pub amount: f64,
    #[serde(default)]
    pub cancelled: bool,
}

/// Itemized monthly stipend of one scholar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StipendResult {
    pub name: String,
    pub total_hours: f64,
    pub stipend: f64,
    pub deductions: Vec<DeductionLine>,
    pub bonuses: Vec<BonusLine>,
    pub attendance_percent: f64,
    pub base_stipend_used: f64,
    pub total_deduction: f64,
    pub total_bonus: f64,
    pub hour_deficit: f64,
    pub required_hours: f64,
    pub working_days: usize,
    pub approved_absence_hours: f64,
    pub approved_lateness_count: usize,
    pub daily: Vec<DailyRecord>,
    #[serde(default)]
    pub bonus_counts: BTreeMap<String, f64>,
}

/// The unit persisted per organization and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: MonthLabel,
    pub layout: Layout,
    pub active_days: Option<BTreeSet<u32>>,
    pub results: Vec<StipendResult>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl MonthlyReport {
    pub fn total_payout(&self) -> f64 {
        self.results.iter().map(|r| r.stipend).sum()
    }

    pub fn scholar(&self, name: &str) -> Option<&StipendResult> {
        let wanted = name.trim();
        self.results.iter().find(|r| r.name == wanted)
    }
}
