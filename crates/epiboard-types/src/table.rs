//! Data management table model
//!
//! The raw list is loaded once; sorting and searching derive a view from it
//! without mutating it. Edits go through a separate draft buffer that only
//! replaces the row once the server has answered.

use crate::models::CountryRow;
use std::cmp::Ordering;

/// Sort column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Country,
    TotalCases,
    TotalDeaths,
    TotalRecovered,
}

impl SortColumn {
    pub const ALL: [SortColumn; 4] = [
        SortColumn::Country,
        SortColumn::TotalCases,
        SortColumn::TotalDeaths,
        SortColumn::TotalRecovered,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            SortColumn::Country => "manage.country",
            SortColumn::TotalCases => "manage.totalCases",
            SortColumn::TotalDeaths => "manage.totalDeaths",
            SortColumn::TotalRecovered => "manage.totalRecovered",
        }
    }

    fn compare(&self, a: &CountryRow, b: &CountryRow) -> Ordering {
        match self {
            SortColumn::Country => a.country.cmp(&b.country),
            SortColumn::TotalCases => a.total_cases.cmp(&b.total_cases),
            SortColumn::TotalDeaths => a.total_deaths.cmp(&b.total_deaths),
            SortColumn::TotalRecovered => a.total_recovered.cmp(&b.total_recovered),
        }
    }
}

impl std::str::FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "country" => Ok(SortColumn::Country),
            "totalCases" | "cases" => Ok(SortColumn::TotalCases),
            "totalDeaths" | "deaths" => Ok(SortColumn::TotalDeaths),
            "totalRecovered" | "recovered" => Ok(SortColumn::TotalRecovered),
            other => Err(format!("Unknown column '{}'", other)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            column: SortColumn::Country,
            direction: SortDirection::Asc,
        }
    }
}

impl SortConfig {
    /// Same column while ascending flips to descending; anything else sorts ascending
    pub fn toggle(self, column: SortColumn) -> Self {
        let direction = if self.column == column && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        Self { column, direction }
    }

    pub fn compare(&self, a: &CountryRow, b: &CountryRow) -> Ordering {
        let cmp = self.column.compare(a, b);
        match self.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        }
    }
}

/// Editable fields of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Country,
    TotalCases,
    TotalDeaths,
    TotalRecovered,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Country,
        DraftField::TotalCases,
        DraftField::TotalDeaths,
        DraftField::TotalRecovered,
    ];

    fn index(&self) -> usize {
        match self {
            DraftField::Country => 0,
            DraftField::TotalCases => 1,
            DraftField::TotalDeaths => 2,
            DraftField::TotalRecovered => 3,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, DraftField::Country)
    }
}

/// Row being edited. Inputs are held exactly as typed and only parsed
/// when the row is built for saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    values: [String; 4],
}

impl EditDraft {
    fn from_row(row: &CountryRow) -> Self {
        Self {
            id: row.id.clone(),
            values: [
                row.country.clone(),
                row.total_cases.to_string(),
                row.total_deaths.to_string(),
                row.total_recovered.to_string(),
            ],
        }
    }

    pub fn value(&self, field: DraftField) -> &str {
        &self.values[field.index()]
    }

    pub fn update(&mut self, field: DraftField, raw: &str) {
        self.values[field.index()] = raw.to_string();
    }

    fn count(&self, field: DraftField) -> Option<i64> {
        self.value(field).trim().parse::<i64>().ok()
    }

    /// Numeric fields must hold a whole number; empty counts as invalid
    pub fn is_valid(&self, field: DraftField) -> bool {
        !field.is_numeric() || self.count(field).is_some()
    }

    pub fn invalid_fields(&self) -> Vec<DraftField> {
        DraftField::ALL
            .into_iter()
            .filter(|f| !self.is_valid(*f))
            .collect()
    }

    /// The record to send, or `None` while any numeric field is invalid
    pub fn to_row(&self) -> Option<CountryRow> {
        Some(CountryRow {
            id: self.id.clone(),
            country: self.value(DraftField::Country).to_string(),
            total_cases: self.count(DraftField::TotalCases)?,
            total_deaths: self.count(DraftField::TotalDeaths)?,
            total_recovered: self.count(DraftField::TotalRecovered)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManageTable {
    rows: Vec<CountryRow>,
    pub sort: SortConfig,
    pub search: String,
    draft: Option<EditDraft>,
}

impl ManageTable {
    pub fn new(rows: Vec<CountryRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn rows(&self) -> &[CountryRow] {
        &self.rows
    }

    pub fn set_rows(&mut self, rows: Vec<CountryRow>) {
        self.rows = rows;
        self.draft = None;
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort = self.sort.toggle(column);
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Filtered and sorted view; the raw list is untouched
    pub fn visible_rows(&self) -> Vec<CountryRow> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<CountryRow> = self
            .rows
            .iter()
            .filter(|r| needle.is_empty() || r.country.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }

    pub fn begin_edit(&mut self, id: &str) -> bool {
        match self.rows.iter().find(|r| r.id == id) {
            Some(row) => {
                self.draft = Some(EditDraft::from_row(row));
                true
            }
            None => false,
        }
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Record to save, if a draft is open and every field is valid
    pub fn draft_row(&self) -> Option<CountryRow> {
        self.draft.as_ref().and_then(EditDraft::to_row)
    }

    pub fn can_save(&self) -> bool {
        self.draft_row().is_some()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.draft.as_ref().is_some_and(|d| d.id == id)
    }

    pub fn update_draft(&mut self, field: DraftField, raw: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.update(field, raw);
        }
    }

    /// Discard the draft without any network call
    pub fn cancel_edit(&mut self) {
        self.draft = None;
    }

    /// Replace the row with the server's authoritative copy and close the draft
    pub fn apply_saved(&mut self, saved: CountryRow) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.id == saved.id) {
            *row = saved;
        }
        self.draft = None;
    }

    /// Drop a row after the backend confirmed the delete
    pub fn remove(&mut self, id: &str) -> Option<CountryRow> {
        if self.is_editing(id) {
            self.draft = None;
        }
        let index = self.rows.iter().position(|r| r.id == id)?;
        Some(self.rows.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, country: &str, cases: i64) -> CountryRow {
        CountryRow {
            id: id.to_string(),
            country: country.to_string(),
            total_cases: cases,
            total_deaths: cases / 10,
            total_recovered: cases / 2,
        }
    }

    fn table() -> ManageTable {
        ManageTable::new(vec![
            row("1", "France", 300),
            row("2", "Finland", 100),
            row("3", "Brazil", 500),
            row("4", "Fiji", 200),
        ])
    }

    fn ids(rows: &[CountryRow]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_default_sort_is_country_ascending() {
        let t = table();
        assert_eq!(ids(&t.visible_rows()), vec!["3", "4", "2", "1"]);
    }

    #[test]
    fn test_toggle_same_column_reverses() {
        let mut t = table();
        t.set_search("f");
        t.sort_by(SortColumn::TotalCases);
        assert_eq!(t.sort.direction, SortDirection::Asc);
        let asc = t.visible_rows();
        assert_eq!(ids(&asc), vec!["2", "4", "1"]);

        t.sort_by(SortColumn::TotalCases);
        assert_eq!(t.sort.direction, SortDirection::Desc);
        let desc = t.visible_rows();
        assert_eq!(ids(&desc), vec!["1", "4", "2"]);

        let mut a = ids(&asc);
        let mut d = ids(&desc);
        a.sort();
        d.sort();
        assert_eq!(a, d);
    }

    #[test]
    fn test_other_column_resets_to_ascending() {
        let mut t = table();
        t.sort_by(SortColumn::Country);
        assert_eq!(t.sort.direction, SortDirection::Desc);
        t.sort_by(SortColumn::TotalDeaths);
        assert_eq!(t.sort.direction, SortDirection::Asc);
        t.sort_by(SortColumn::TotalDeaths);
        t.sort_by(SortColumn::TotalDeaths);
        assert_eq!(t.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn test_search_is_case_insensitive_and_non_mutating() {
        let mut t = table();
        t.set_search("FI");
        assert_eq!(ids(&t.visible_rows()), vec!["4", "2"]);
        assert_eq!(t.rows().len(), 4);
        assert_eq!(t.rows()[0].id, "1");
    }

    #[test]
    fn test_edit_cancel_keeps_rows() {
        let mut t = table();
        assert!(t.begin_edit("2"));
        t.update_draft(DraftField::TotalCases, "999");
        let draft = t.draft().unwrap();
        assert_eq!(draft.value(DraftField::TotalCases), "999");
        assert_eq!(t.draft_row().map(|r| r.total_cases), Some(999));

        t.cancel_edit();
        assert!(t.draft().is_none());
        assert_eq!(t.rows()[1].total_cases, 100);
    }

    #[test]
    fn test_apply_saved_uses_server_copy() {
        let mut t = table();
        t.begin_edit("2");
        t.update_draft(DraftField::Country, "finland ");
        let mut server = row("2", "Finland", 150);
        server.total_deaths = 12;
        t.apply_saved(server.clone());
        assert!(t.draft().is_none());
        assert_eq!(t.rows()[1], server);
    }

    #[test]
    fn test_remove() {
        let mut t = table();
        t.begin_edit("3");
        assert_eq!(t.remove("3").map(|r| r.country), Some("Brazil".to_string()));
        assert!(t.draft().is_none());
        assert!(t.remove("3").is_none());
        assert_eq!(t.rows().len(), 3);
    }

    #[test]
    fn test_begin_edit_unknown_id() {
        let mut t = table();
        assert!(!t.begin_edit("nope"));
        assert!(!t.is_editing("nope"));
    }

    #[test]
    fn test_cleared_count_blocks_save() {
        let mut t = table();
        t.begin_edit("1");
        for input in ["30", "3", ""] {
            t.update_draft(DraftField::TotalCases, input);
        }
        let draft = t.draft().unwrap();
        assert_eq!(draft.value(DraftField::TotalCases), "");
        assert_eq!(draft.invalid_fields(), vec![DraftField::TotalCases]);
        assert!(t.draft_row().is_none());
        assert!(!t.can_save());

        t.update_draft(DraftField::TotalCases, "42");
        assert_eq!(t.draft_row().map(|r| r.total_cases), Some(42));
    }

    #[test]
    fn test_non_numeric_count_is_kept_as_typed() {
        let mut t = table();
        t.begin_edit("2");
        t.update_draft(DraftField::TotalDeaths, "12a");
        assert_eq!(t.draft().unwrap().value(DraftField::TotalDeaths), "12a");
        assert!(!t.draft().unwrap().is_valid(DraftField::TotalDeaths));
        assert!(!t.can_save());
    }
}
