//! Organization stipend settings.
//!
//! Settings are persisted as JSON and may come from older saved shapes, from a
//! hand-written YAML/JSON file or from the template generator. Every path goes
//! through [`normalize`] before the calculator sees them.

pub mod migrate;
pub mod template;
pub mod validate;

use crate::errors::{AppError, AppResult};
use crate::utils::time::{hhmm, hours_of};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use migrate::CURRENT_SCHEMA_VERSION;

/// Hourly deduction rates selected by session attendance percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionRule {
    pub high_rate: f64,
    pub low_rate: f64,
    pub threshold_percent: f64,
}

impl Default for DeductionRule {
    fn default() -> Self {
        Self {
            high_rate: 25.0,
            low_rate: 20.0,
            threshold_percent: 90.0,
        }
    }
}

impl DeductionRule {
    /// At or above the threshold the low rate applies.
    pub fn rate_for(&self, attendance_percent: f64) -> f64 {
        if attendance_percent + crate::core::calculator::EPSILON >= self.threshold_percent {
            self.low_rate
        } else {
            self.high_rate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionOverride {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rule: DeductionRule,
}

/// A daily study session ("seder").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub punctuality_bonus_enabled: bool,
    #[serde(default)]
    pub lateness_grace_minutes: u32,
    #[serde(default)]
    pub punctuality_bonus_amount: f64,
    #[serde(default)]
    pub punctuality_bonus_cancellation_threshold: u32,
    #[serde(default)]
    pub partial_stipend_percentage: f64,
    #[serde(default)]
    pub deduction_override: DeductionOverride,
}

impl Session {
    pub fn start_hours(&self) -> f64 {
        hours_of(self.start)
    }

    pub fn end_hours(&self) -> f64 {
        hours_of(self.end)
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end_hours() - self.start_hours()).max(0.0)
    }

    /// Session override when enabled, else the organization default.
    pub fn deduction_rule<'a>(&'a self, global: &'a DeductionRule) -> &'a DeductionRule {
        if self.deduction_override.enabled {
            &self.deduction_override.rule
        } else {
            global
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BonusKind {
    /// Occurrence count × amount.
    #[default]
    Count,
    /// The column already holds a currency amount.
    Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralBonus {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: BonusKind,
    #[serde(default)]
    pub attendance_gated: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rounding {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "upTo10")]
    UpTo10,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarOverride {
    /// Session ids counted for this scholar; empty means all sessions.
    #[serde(default)]
    pub sessions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default = "default_base_stipend")]
    pub base_stipend: f64,
    #[serde(default)]
    pub deduction: DeductionRule,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub general_bonuses: Vec<GeneralBonus>,
    #[serde(default)]
    pub bonus_attendance_threshold: f64,
    #[serde(default)]
    pub rounding: Rounding,
    #[serde(default)]
    pub scholar_overrides: BTreeMap<String, ScholarOverride>,
}

fn default_base_stipend() -> f64 {
    2000.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            base_stipend: default_base_stipend(),
            deduction: DeductionRule::default(),
            sessions: Vec::new(),
            general_bonuses: Vec::new(),
            bonus_attendance_threshold: 0.0,
            rounding: Rounding::None,
            scholar_overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn session(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Sessions counted for `scholar`: the override list if non-empty, else all.
    pub fn assigned_sessions(&self, scholar: &str) -> Vec<&Session> {
        match self.scholar_overrides.get(scholar.trim()) {
            Some(o) if !o.sessions.is_empty() => self
                .sessions
                .iter()
                .filter(|s| o.sessions.iter().any(|id| id == &s.id))
                .collect(),
            _ => self.sessions.iter().collect(),
        }
    }

    /// Re-run normalization on an in-memory value.
    pub fn normalized(&self) -> AppResult<Settings> {
        normalize(serde_json::to_value(self)?)
    }

    /// Load a JSON or YAML settings file, normalizing it.
    pub fn from_file(path: &Path) -> AppResult<Settings> {
        let content = fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        let raw: Value = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        normalize(raw)
    }
}

/// Upgrade any saved shape to the current schema and deserialize it.
///
/// `normalize(serde_json::to_value(normalize(x)?)?)? == normalize(x)?` holds for
/// every accepted input.
pub fn normalize(raw: Value) -> AppResult<Settings> {
    let upgraded = migrate::upgrade(raw)?;

    let mut settings: Settings = serde_json::from_value(upgraded)
        .map_err(|e| AppError::InvalidSettings(e.to_string()))?;

    for (i, s) in settings.sessions.iter_mut().enumerate() {
        if s.id.trim().is_empty() {
            s.id = format!("seder-{}", i + 1);
        }
    }

    settings.schema_version = CURRENT_SCHEMA_VERSION;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_switches_at_threshold() {
        let rule = DeductionRule::default();
        assert_eq!(rule.rate_for(90.0), 20.0);
        assert_eq!(rule.rate_for(87.5), 25.0);
    }

    #[test]
    fn overrides_restrict_assigned_sessions() {
        let s = normalize(json!({
            "sessions": [
                {"id": "a", "name": "סדר א", "start": "09:00", "end": "13:00"},
                {"id": "b", "name": "סדר ב", "start": "15:00", "end": "19:00"}
            ],
            "scholarOverrides": {"Levi": {"sessions": ["b"]}}
        }))
        .unwrap();

        let ids: Vec<_> = s.assigned_sessions("Levi").iter().map(|x| x.id.clone()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(s.assigned_sessions("Cohen").len(), 2);
    }

    #[test]
    fn missing_session_ids_are_generated() {
        let s = normalize(json!({
            "sessions": [{"name": "Morning", "start": "09:00", "end": "13:00"}]
        }))
        .unwrap();
        assert_eq!(s.sessions[0].id, "seder-1");
        assert_eq!(s.sessions[0].duration_hours(), 4.0);
    }
}
