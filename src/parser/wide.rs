//! Multi-scholar layout: scholars as rows, (date, session, kind) triples as columns.

use super::layout::HEADER_SCAN_ROWS;
use super::month::resolve_month;
use super::normalize::{date_parts, punch_value};
use super::punch::{describe, evaluate};
use super::tokens::{ColumnKind, HeaderField, column_kind, fold, matches};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::ScholarAttendance;
use crate::models::cell::{Row, cell_at, grid_width, row_cell};
use crate::models::month::MonthLabel;
use crate::settings::Settings;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Positions of the four header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderRows {
    pub date_row: usize,
    pub session_row: usize,
    pub kind_row: usize,
    pub name_row: usize,
    pub name_col: usize,
}

impl HeaderRows {
    pub fn last_row(&self) -> usize {
        self.date_row
            .max(self.session_row)
            .max(self.kind_row)
            .max(self.name_row)
    }
}

/// Where a mapped column sits in the (date, session, kind) space.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub day: u32,
    pub session_label: String,
    pub kind: ColumnKind,
    pub kind_label: String,
}

#[derive(Debug)]
pub struct WideSheet {
    pub month: MonthLabel,
    pub scholars: Vec<ScholarAttendance>,
    pub active_days: BTreeSet<u32>,
}

/// A row holding more than two dates / day numbers is the date row.
fn is_date_row(row: &Row) -> bool {
    row.iter().filter(|c| date_parts(c).is_some()).count() > 2
}

pub fn locate_headers(grid: &[Row]) -> AppResult<HeaderRows> {
    let scan = &grid[..grid.len().min(HEADER_SCAN_ROWS)];

    let date_row = scan.iter().position(is_date_row);
    let session_row = scan.iter().position(|r| {
        r.iter()
            .any(|c| matches(HeaderField::SessionMarker, &c.as_text()))
    });
    let kind_row = scan.iter().position(|r| {
        let has = |f| r.iter().any(|c| matches(f, &c.as_text()));
        has(HeaderField::Entry) && has(HeaderField::Exit)
    });
    let name = scan.iter().enumerate().find_map(|(ri, r)| {
        r.iter()
            .position(|c| matches(HeaderField::ScholarName, &c.as_text()))
            .map(|ci| (ri, ci))
    });

    match (date_row, session_row, kind_row, name) {
        (Some(date_row), Some(session_row), Some(kind_row), Some((name_row, name_col))) => {
            let h = HeaderRows {
                date_row,
                session_row,
                kind_row,
                name_row,
                name_col,
            };
            debug!(?h, "located multi-scholar header rows");
            Ok(h)
        }
        _ => {
            let mut missing = Vec::new();
            let mut found = Vec::new();
            let mut note = |label: &str, idx: Option<usize>| match idx {
                Some(i) => found.push(format!("{label} {i}")),
                None => missing.push(label.to_string()),
            };
            note("date row", date_row);
            note("session row", session_row);
            note("type row (entry/exit)", kind_row);
            match name {
                Some((r, c)) => found.push(format!("name row {r} (column {c})")),
                None => missing.push("name column".to_string()),
            }
            if found.is_empty() {
                found.push("none".to_string());
            }
            Err(AppError::MissingHeaders { missing, found })
        }
    }
}

/// Walks the header block left to right; sparse date and session cells inherit the
/// nearest non-empty value to their left.
pub fn map_columns(grid: &[Row], h: &HeaderRows) -> BTreeMap<usize, ColumnSlot> {
    let mut slots = BTreeMap::new();
    let mut day: Option<u32> = None;
    let mut session: Option<String> = None;

    for col in 0..grid_width(grid) {
        if col == h.name_col {
            continue;
        }

        if let Some(p) = date_parts(cell_at(grid, h.date_row, col)) {
            day = Some(p.day);
        }

        let label = cell_at(grid, h.session_row, col);
        if !label.is_empty() {
            session = Some(label.as_text());
        }

        let kind_cell = cell_at(grid, h.kind_row, col).as_text();
        if let (Some(kind), Some(d), Some(s)) = (column_kind(&kind_cell), day, session.as_ref()) {
            slots.insert(
                col,
                ColumnSlot {
                    day: d,
                    session_label: s.clone(),
                    kind,
                    kind_label: kind_cell,
                },
            );
        }
    }

    slots
}

/// Header label → configured session id. A label naming a session (or its id)
/// maps to it; the rest take the unclaimed sessions in configured order.
pub fn resolve_session_labels<'a, I>(labels: I, settings: &Settings) -> HashMap<String, String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut out: HashMap<String, String> = HashMap::new();
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut pending: Vec<&String> = Vec::new();

    for label in labels {
        if out.contains_key(label) || pending.contains(&label) {
            continue;
        }
        let folded = fold(label);
        let named = settings.sessions.iter().find(|s| {
            let name = fold(&s.name);
            (!name.is_empty() && folded.contains(&name)) || folded == fold(&s.id)
        });
        match named {
            Some(s) if !claimed.contains(s.id.as_str()) => {
                claimed.insert(s.id.as_str());
                out.insert(label.clone(), s.id.clone());
            }
            _ => pending.push(label),
        }
    }

    let mut free = settings
        .sessions
        .iter()
        .filter(|s| !claimed.contains(s.id.as_str()));
    for label in pending {
        match free.next() {
            Some(s) => {
                out.insert(label.clone(), s.id.clone());
            }
            None => break,
        }
    }

    out
}

/// First header cell containing the bonus name, skipping claimed columns.
fn locate_bonus_columns(
    grid: &[Row],
    h: &HeaderRows,
    claimed: &BTreeMap<usize, ColumnSlot>,
    settings: &Settings,
) -> Vec<(String, usize)> {
    let width = grid_width(grid);
    let mut out = Vec::new();

    for bonus in &settings.general_bonuses {
        let needle = fold(&bonus.name);
        if needle.is_empty() {
            continue;
        }
        let hit = (0..=h.last_row()).find_map(|r| {
            (0..width).find(|&c| {
                c != h.name_col
                    && !claimed.contains_key(&c)
                    && fold(&cell_at(grid, r, c).as_text()).contains(&needle)
            })
        });
        if let Some(col) = hit {
            out.push((bonus.name.clone(), col));
        }
    }

    out
}

#[derive(Default)]
struct SlotGroup {
    entry: Option<usize>,
    exit: Option<usize>,
}

pub fn extract(grid: &[Row], filename: Option<&str>, settings: &Settings) -> AppResult<WideSheet> {
    let headers = locate_headers(grid)?;
    let month = resolve_month(filename, grid).ok_or(AppError::UnknownMonth)?;
    let slots = map_columns(grid, &headers);
    debug!(columns = slots.len(), %month, "mapped multi-scholar columns");

    let labels = resolve_session_labels(slots.values().map(|s| &s.session_label), settings);

    let mut groups: BTreeMap<(u32, String), SlotGroup> = BTreeMap::new();
    let mut bonus_slots: Vec<(usize, &ColumnSlot)> = Vec::new();
    for (&col, slot) in &slots {
        if slot.kind == ColumnKind::Bonus {
            bonus_slots.push((col, slot));
            continue;
        }
        let Some(session_id) = labels.get(&slot.session_label) else {
            continue;
        };
        let g = groups.entry((slot.day, session_id.clone())).or_default();
        match slot.kind {
            ColumnKind::Entry if g.entry.is_none() => g.entry = Some(col),
            ColumnKind::Exit if g.exit.is_none() => g.exit = Some(col),
            _ => {}
        }
    }

    let bonus_cols = locate_bonus_columns(grid, &headers, &slots, settings);

    let mut scholars = Vec::new();
    let mut active_days = BTreeSet::new();

    for row in grid.iter().skip(headers.last_row() + 1) {
        let name = row_cell(row, headers.name_col).as_text();
        if name.is_empty() || matches(HeaderField::Total, &name) {
            continue;
        }

        for (&col, slot) in &slots {
            if !row_cell(row, col).is_empty() {
                active_days.insert(slot.day);
            }
        }

        let mut scholar = ScholarAttendance::new(&name);
        let cell = |col: usize| row_cell(row, col);

        for ((day, session_id), g) in &groups {
            let (Some(ec), Some(xc)) = (g.entry, g.exit) else {
                continue;
            };
            let Some(session) = settings.session(session_id) else {
                continue;
            };
            let entry = punch_value(cell(ec));
            let exit = punch_value(cell(xc));
            if let Some(p) = evaluate(entry, exit, session) {
                let record = scholar.day_mut(*day, || month.day_label(*day));
                p.apply(record, session_id);
                record.append_punches(&describe(entry, exit));
            }
        }

        for (col, slot) in &bonus_slots {
            let c = cell(*col);
            if c.is_empty() {
                continue;
            }
            scholar.add_bonus(&slot.kind_label, c.as_number().unwrap_or(1.0));
        }

        for (bonus_name, col) in &bonus_cols {
            if let Some(v) = cell(*col).as_number()
                && v != 0.0
            {
                scholar.add_bonus(bonus_name, v);
            }
        }

        scholar.days.sort_by_key(|d| d.day);
        scholars.push(scholar);
    }

    Ok(WideSheet {
        month,
        scholars,
        active_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cell::Cell;
    use crate::settings::normalize;
    use serde_json::json;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn settings() -> Settings {
        normalize(json!({
            "sessions": [
                {"id": "a", "name": "סדר א", "start": "09:00", "end": "13:00"},
                {"id": "b", "name": "סדר ב", "start": "15:00", "end": "19:00"}
            ]
        }))
        .unwrap()
    }

    fn grid() -> Vec<Row> {
        let e = || Cell::Empty;
        vec![
            vec![e(), t("01/03/2024"), e(), t("02/03/2024"), e(), t("03/03/2024"), e()],
            vec![e(), t("סדר א"), e(), e(), e(), e(), e()],
            vec![t("שם"), t("כניסה"), t("יציאה"), t("כניסה"), t("יציאה"), t("כניסה"), t("יציאה")],
            vec![t("לוי"), t("09:00"), t("13:00"), t("09:20"), t("13:00")],
            vec![t("כהן"), Cell::Number(900.0), Cell::Number(1300.0)],
            vec![t("סה\"כ"), t("8:00")],
        ]
    }

    #[test]
    fn header_rows_are_found() {
        let h = locate_headers(&grid()).unwrap();
        assert_eq!(
            h,
            HeaderRows {
                date_row: 0,
                session_row: 1,
                kind_row: 2,
                name_row: 2,
                name_col: 0,
            }
        );
        assert_eq!(h.last_row(), 2);
    }

    #[test]
    fn sparse_header_cells_inherit_from_the_left() {
        let g = grid();
        let slots = map_columns(&g, &locate_headers(&g).unwrap());
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[&4].day, 2);
        assert_eq!(slots[&4].kind, ColumnKind::Exit);
        assert_eq!(slots[&6].session_label, "סדר א");
    }

    #[test]
    fn scholars_and_active_days_are_extracted() {
        let sheet = extract(&grid(), None, &settings()).unwrap();

        assert_eq!(sheet.month, MonthLabel::new(2024, 3).unwrap());
        assert_eq!(sheet.active_days, BTreeSet::from([1, 2]));
        assert_eq!(sheet.scholars.len(), 2);

        let levi = &sheet.scholars[0];
        assert_eq!(levi.days.len(), 2);
        assert_eq!(levi.days[0].hours("a"), 4.0);
        assert!(levi.days[1].is_late("a"));
        assert!((levi.days[1].hours("a") - (3.0 + 40.0 / 60.0)).abs() < 1e-9);

        let cohen = &sheet.scholars[1];
        assert_eq!(cohen.days.len(), 1);
        assert_eq!(cohen.days[0].hours("a"), 4.0);
    }

    #[test]
    fn missing_type_row_names_what_is_missing() {
        let mut g = grid();
        g[2] = vec![t("שם")];
        let err = locate_headers(&g).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("type row"));
        assert!(msg.contains("date row 0"));
    }

    #[test]
    fn labels_resolve_by_name_then_by_order() {
        let labels = vec!["סדר ב - ערב".to_string(), "Morning".to_string()];
        let map = resolve_session_labels(labels.iter(), &settings());
        assert_eq!(map["סדר ב - ערב"], "b");
        assert_eq!(map["Morning"], "a");
    }

    #[test]
    fn labels_beyond_the_configured_sessions_are_dropped() {
        let labels = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let map = resolve_session_labels(labels.iter(), &settings());
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("z"));
    }
}
