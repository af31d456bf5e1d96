//! Settings templates from free text.
//!
//! A generator (for instance one backed by a language model) turns a prompt into a
//! candidate settings document. Its output is never trusted: it goes through the same
//! normalization and validation as a manually imported file.

use super::{DeductionOverride, DeductionRule, Rounding, Session, Settings, normalize, validate};
use crate::errors::AppResult;
use chrono::NaiveTime;
use regex::Regex;
use serde_json::Value;

pub trait TemplateGenerator {
    fn generate(&self, prompt: &str) -> AppResult<Value>;
}

/// Normalize and validate whatever the generator produced.
pub fn settings_from_template<G: TemplateGenerator + ?Sized>(
    generator: &G,
    prompt: &str,
) -> AppResult<Settings> {
    let candidate = generator.generate(prompt)?;
    let settings = normalize(candidate)?;
    validate::validate(&settings)?;
    Ok(settings)
}

/// Offline generator: a two-session day, tuned by a few prompt keywords
/// (an amount of 3-5 digits sets the base stipend, "round" enables rounding).
pub struct DefaultTemplate;

impl DefaultTemplate {
    pub fn settings(&self) -> Settings {
        let rule = DeductionRule::default();
        Settings {
            sessions: vec![
                session("morning", "סדר א", (9, 0), (13, 0), 60.0, &rule),
                session("afternoon", "סדר ב", (15, 0), (19, 0), 40.0, &rule),
            ],
            ..Settings::default()
        }
    }
}

impl TemplateGenerator for DefaultTemplate {
    fn generate(&self, prompt: &str) -> AppResult<Value> {
        let mut settings = self.settings();

        let amount = Regex::new(r"\b(\d{3,5})\b").map_err(|e| {
            crate::errors::AppError::InvalidSettings(format!("template pattern: {e}"))
        })?;
        if let Some(m) = amount.captures(prompt).and_then(|c| c.get(1))
            && let Ok(v) = m.as_str().parse::<f64>()
        {
            settings.base_stipend = v;
        }

        if prompt.to_lowercase().contains("round") {
            settings.rounding = Rounding::UpTo10;
        }

        Ok(serde_json::to_value(settings)?)
    }
}

fn session(
    id: &str,
    name: &str,
    start: (u32, u32),
    end: (u32, u32),
    partial: f64,
    rule: &DeductionRule,
) -> Session {
    Session {
        id: id.to_string(),
        name: name.to_string(),
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or_default(),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or_default(),
        punctuality_bonus_enabled: true,
        lateness_grace_minutes: 10,
        punctuality_bonus_amount: 10.0,
        punctuality_bonus_cancellation_threshold: 4,
        partial_stipend_percentage: partial,
        deduction_override: DeductionOverride {
            enabled: false,
            rule: rule.clone(),
        },
    }
}
