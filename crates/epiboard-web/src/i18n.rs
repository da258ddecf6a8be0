//! Reactive translation context

use crate::storage::LocalStorage;
use epiboard_types::{translate, translate_with, CountryCode, DurableStorage, Language, StorageKey};
use leptos::logging::warn;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct I18n {
    language: RwSignal<Language>,
}

impl I18n {
    /// Stored language, else the country default
    pub fn new(country: CountryCode) -> Self {
        let language = LocalStorage
            .language()
            .unwrap_or_else(|| Language::default_for(country));
        Self {
            language: RwSignal::new(language),
        }
    }

    pub fn language(&self) -> Language {
        self.language.get()
    }

    pub fn set_language(&self, language: Language) {
        if let Err(e) = LocalStorage.set(StorageKey::Language, language.as_str()) {
            warn!("Failed to persist language: {}", e);
        }
        self.language.set(language);
    }

    /// Keep the language valid for the country's selector
    pub fn follow_country(&self, country: CountryCode) {
        let current = self.language.get_untracked();
        if !Language::options_for(country).contains(&current) {
            self.set_language(Language::default_for(country));
        }
    }

    /// Reactive lookup; call inside a closure to re-render on change
    pub fn t(&self, key: &'static str) -> String {
        translate(self.language.get(), key).to_string()
    }

    pub fn tf(&self, key: &str, args: &[&str]) -> String {
        translate_with(self.language.get(), key, args)
    }
}

pub fn provide_i18n(country: CountryCode) -> I18n {
    let i18n = I18n::new(country);
    provide_context(i18n);
    i18n
}

pub fn use_i18n() -> I18n {
    expect_context::<I18n>()
}
