//! Versioned upgrade chain for saved settings shapes.
//!
//! Each step only fills in what is absent and moves legacy keys to their new
//! location, so a document that already has the newer shape passes through
//! unchanged. The version stamp is written last.

use crate::errors::{AppError, AppResult};
use serde_json::{Map, Value, json};

pub const CURRENT_SCHEMA_VERSION: u32 = 4;

type Step = fn(&mut Map<String, Value>);

/// (version the step upgrades from, step)
const STEPS: [(u32, Step); 3] = [
    (1, nest_deduction_rule),
    (2, backfill_session_overrides),
    (3, tag_bonus_types),
];

const FLAT_HIGH: [&str; 2] = ["deductionRateHigh", "highDeductionRate"];
const FLAT_LOW: [&str; 2] = ["deductionRateLow", "lowDeductionRate"];
const FLAT_THRESHOLD: [&str; 2] = ["deductionThreshold", "attendanceThreshold"];

pub fn upgrade(mut raw: Value) -> AppResult<Value> {
    let obj = raw.as_object_mut().ok_or_else(|| {
        AppError::InvalidSettings("settings must be a JSON/YAML object".to_string())
    })?;

    let mut version = detect_version(obj);

    for (from, step) in STEPS {
        if version == from {
            step(obj);
            version = from + 1;
        }
    }

    obj.insert("schemaVersion".to_string(), json!(version));
    Ok(raw)
}

fn detect_version(obj: &Map<String, Value>) -> u32 {
    obj.get("schemaVersion")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(1)
        .clamp(1, CURRENT_SCHEMA_VERSION)
}

/// Removes the first present key of `names` and returns its value.
fn take_any(obj: &mut Map<String, Value>, names: &[&str]) -> Option<Value> {
    names.iter().find_map(|n| obj.remove(*n))
}

/// v1 → v2: flat `deductionRateHigh/Low` + threshold move into `deduction {..}`.
fn nest_deduction_rule(obj: &mut Map<String, Value>) {
    let high = take_any(obj, &FLAT_HIGH);
    let low = take_any(obj, &FLAT_LOW);
    let threshold = take_any(obj, &FLAT_THRESHOLD);

    let entry = obj
        .entry("deduction".to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    if let Some(rule) = entry.as_object_mut() {
        for (key, value) in [
            ("highRate", high),
            ("lowRate", low),
            ("thresholdPercent", threshold),
        ] {
            if let Some(v) = value
                && !rule.contains_key(key)
            {
                rule.insert(key.to_string(), v);
            }
        }

        let defaults = crate::settings::DeductionRule::default();
        rule.entry("highRate").or_insert(json!(defaults.high_rate));
        rule.entry("lowRate").or_insert(json!(defaults.low_rate));
        rule.entry("thresholdPercent")
            .or_insert(json!(defaults.threshold_percent));
    }
}

/// v2 → v3: every session gets a `deductionOverride`, disabled and seeded with the
/// global rule unless the session carried its own flat rates.
fn backfill_session_overrides(obj: &mut Map<String, Value>) {
    let global = obj.get("deduction").cloned().unwrap_or_else(|| json!({}));

    let Some(sessions) = obj.get_mut("sessions").and_then(Value::as_array_mut) else {
        return;
    };

    for session in sessions.iter_mut().filter_map(Value::as_object_mut) {
        if session.contains_key("deductionOverride") {
            continue;
        }

        let high = take_any(session, &FLAT_HIGH);
        let low = take_any(session, &FLAT_LOW);
        let threshold = take_any(session, &FLAT_THRESHOLD);
        let custom = high.is_some() || low.is_some();

        let mut rule = global.as_object().cloned().unwrap_or_default();
        if let Some(v) = high {
            rule.insert("highRate".to_string(), v);
        }
        if let Some(v) = low {
            rule.insert("lowRate".to_string(), v);
        }
        if let Some(v) = threshold {
            rule.insert("thresholdPercent".to_string(), v);
        }

        session.insert(
            "deductionOverride".to_string(),
            json!({ "enabled": custom, "rule": Value::Object(rule) }),
        );
    }
}

/// v3 → v4: general bonuses get an explicit `type`.
fn tag_bonus_types(obj: &mut Map<String, Value>) {
    let Some(bonuses) = obj.get_mut("generalBonuses").and_then(Value::as_array_mut) else {
        return;
    };

    for bonus in bonuses.iter_mut().filter_map(Value::as_object_mut) {
        let is_amount = bonus
            .remove("isAmount")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        if !bonus.contains_key("type") {
            let kind = if is_amount { "amount" } else { "count" };
            bonus.insert("type".to_string(), json!(kind));
        }
    }
}
