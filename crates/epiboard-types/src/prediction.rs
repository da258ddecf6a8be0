//! Prediction form state machine
//!
//! `Idle -> Editing -> Submitting -> {Result, Error}`, back to `Editing` on any
//! further edit. Region and country form a cascading pair: the available
//! countries are always `countries_by_region[region]`.

use crate::error::ApiResult;
use crate::models::{InputRow, Metadata, PredictionOut};
use crate::models::covid::percentage;
use chrono::NaiveDate;

/// Free-form fields of the input record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Confirmed,
    Deaths,
    Recovered,
    Active,
    NewCases,
    NewRecovered,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::Confirmed,
        FormField::Deaths,
        FormField::Recovered,
        FormField::Active,
        FormField::NewCases,
        FormField::NewRecovered,
        FormField::Date,
    ];

    pub const NUMERIC: [FormField; 6] = [
        FormField::Confirmed,
        FormField::Deaths,
        FormField::Recovered,
        FormField::Active,
        FormField::NewCases,
        FormField::NewRecovered,
    ];

    fn index(&self) -> usize {
        match self {
            FormField::Confirmed => 0,
            FormField::Deaths => 1,
            FormField::Recovered => 2,
            FormField::Active => 3,
            FormField::NewCases => 4,
            FormField::NewRecovered => 5,
            FormField::Date => 6,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            FormField::Confirmed => "prediction.confirmed",
            FormField::Deaths => "prediction.deaths",
            FormField::Recovered => "prediction.recovered",
            FormField::Active => "prediction.active",
            FormField::NewCases => "prediction.newCases",
            FormField::NewRecovered => "prediction.newRecovered",
            FormField::Date => "prediction.date",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FormField::Date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Idle,
    Editing,
    Submitting,
    Result(f64),
    Error(String),
}

/// Values shown in the results panel
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub predicted: f64,
    pub death_rate: Option<f64>,
    pub recovery_rate: Option<f64>,
    pub region: String,
    pub country: String,
    pub date: String,
    pub confirmed: i64,
}

impl PredictionView {
    fn new(row: &InputRow, predicted: f64) -> Self {
        let confirmed = row.confirmed as f64;
        Self {
            predicted,
            death_rate: percentage(predicted, confirmed),
            recovery_rate: percentage(row.recovered as f64, confirmed),
            region: row.who_region.clone(),
            country: row.country.clone(),
            date: row.date.clone(),
            confirmed: row.confirmed,
        }
    }
}

/// `parseInt`-style coercion: leading integer prefix, anything else is 0
pub fn coerce_int(raw: &str) -> i64 {
    let s = raw.trim();
    let end = s
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);
    s[..end].parse().unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionForm {
    values: [String; 7],
    region: String,
    country: String,
    available_countries: Vec<String>,
    metadata: Option<Metadata>,
    metadata_error: Option<String>,
    phase: FormPhase,
    pending: Option<InputRow>,
    result: Option<PredictionView>,
}

impl Default for PredictionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionForm {
    /// Zero/empty record, metadata not loaded yet
    pub fn new() -> Self {
        Self {
            values: Default::default(),
            region: String::new(),
            country: String::new(),
            available_countries: Vec::new(),
            metadata: None,
            metadata_error: None,
            phase: FormPhase::Idle,
            pending: None,
            result: None,
        }
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    pub fn set_metadata(&mut self, metadata: Metadata) {
        self.metadata = Some(metadata);
        self.metadata_error = None;
        if !self.region.is_empty() {
            self.available_countries = self.lookup_countries(&self.region);
        }
    }

    pub fn metadata_failed(&mut self, message: impl Into<String>) {
        self.metadata_error = Some(message.into());
    }

    pub fn metadata_error(&self) -> Option<&str> {
        self.metadata_error.as_deref()
    }

    pub fn regions(&self) -> &[String] {
        self.metadata
            .as_ref()
            .map(|m| m.who_regions.as_slice())
            .unwrap_or_default()
    }

    /// Region select stays disabled until metadata resolves
    pub fn region_enabled(&self) -> bool {
        self.metadata.is_some()
    }

    fn lookup_countries(&self, region: &str) -> Vec<String> {
        self.metadata
            .as_ref()
            .map(|m| m.countries_in(region))
            .unwrap_or_default()
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    fn touch(&mut self) {
        if self.phase != FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
    }

    /// Change region: clears the country and repopulates the options
    pub fn select_region(&mut self, region: &str) {
        self.region = region.to_string();
        self.country.clear();
        self.available_countries = self.lookup_countries(region);
        self.touch();
    }

    pub fn select_country(&mut self, country: &str) {
        self.country = country.to_string();
        self.touch();
    }

    pub fn set_field(&mut self, field: FormField, raw: &str) {
        self.values[field.index()] = raw.to_string();
        self.touch();
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[field.index()]
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn available_countries(&self) -> &[String] {
        &self.available_countries
    }

    /// Every required field is non-empty and the date is a calendar date
    pub fn is_complete(&self) -> bool {
        !self.region.is_empty()
            && !self.country.is_empty()
            && self.values.iter().all(|v| !v.trim().is_empty())
            && self.date_is_valid()
    }

    pub fn date_is_valid(&self) -> bool {
        NaiveDate::parse_from_str(self.value(FormField::Date).trim(), "%Y-%m-%d").is_ok()
    }

    /// Current values coerced into the wire record
    pub fn input_row(&self) -> InputRow {
        let n = |field: FormField| coerce_int(self.value(field));
        InputRow {
            confirmed: n(FormField::Confirmed),
            deaths: n(FormField::Deaths),
            recovered: n(FormField::Recovered),
            active: n(FormField::Active),
            new_cases: n(FormField::NewCases),
            new_recovered: n(FormField::NewRecovered),
            date: self.value(FormField::Date).trim().to_string(),
            country: self.country.clone(),
            who_region: self.region.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn can_submit(&self) -> bool {
        self.region_enabled() && !self.is_submitting() && self.is_complete()
    }

    pub fn submit_label_key(&self) -> &'static str {
        if self.is_submitting() {
            "prediction.submitting"
        } else {
            "prediction.submit"
        }
    }

    /// Enter `Submitting` and hand back the record to send, clearing any prior result
    pub fn begin_submit(&mut self) -> Option<InputRow> {
        if !self.can_submit() {
            return None;
        }
        let row = self.input_row();
        self.pending = Some(row.clone());
        self.result = None;
        self.phase = FormPhase::Submitting;
        Some(row)
    }

    pub fn finish_submit(&mut self, outcome: ApiResult<PredictionOut>) {
        let pending = self.pending.take();
        match (outcome, pending) {
            (Ok(out), Some(row)) => {
                self.result = Some(PredictionView::new(&row, out.pred_new_deaths));
                self.phase = FormPhase::Result(out.pred_new_deaths);
            }
            (Ok(_), None) => {}
            (Err(err), _) => {
                self.result = None;
                self.phase = FormPhase::Error(err.message);
            }
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Results panel content; `None` keeps the panel hidden
    pub fn results(&self) -> Option<&PredictionView> {
        self.result.as_ref()
    }

    /// Back to the empty record, keeping loaded metadata
    pub fn reset(&mut self) {
        let metadata = self.metadata.take();
        *self = Self::new();
        self.metadata = metadata;
    }
}
