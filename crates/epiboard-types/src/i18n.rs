//! Compiled-in translation catalogs
//!
//! Lookup order: requested language, then French, then the key itself.

use crate::permissions::CountryCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    De,
    It,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Fr, Language::De, Language::It];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::It => "Italiano",
        }
    }

    pub fn default_for(country: CountryCode) -> Self {
        match country {
            CountryCode::Usa => Language::En,
            CountryCode::Fr | CountryCode::Ch => Language::Fr,
        }
    }

    /// Languages offered in the selector for a country
    pub fn options_for(country: CountryCode) -> &'static [Language] {
        match country {
            CountryCode::Usa => &[Language::En],
            CountryCode::Fr => &[Language::Fr, Language::En],
            CountryCode::Ch => &[Language::Fr, Language::De, Language::It],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "fr" => Ok(Language::Fr),
            "de" => Ok(Language::De),
            "it" => Ok(Language::It),
            other => Err(format!("Unsupported language '{}'", other)),
        }
    }
}

pub fn translate<'a>(lang: Language, key: &'a str) -> &'a str {
    lookup(lang, key)
        .or_else(|| lookup(Language::Fr, key))
        .unwrap_or(key)
}

/// Translate and substitute `{n}` placeholders in order
pub fn translate_with(lang: Language, key: &str, args: &[&str]) -> String {
    args.iter()
        .enumerate()
        .fold(translate(lang, key).to_string(), |text, (i, arg)| {
            text.replace(&format!("{{{}}}", i), arg)
        })
}

fn lookup(lang: Language, key: &str) -> Option<&'static str> {
    match lang {
        Language::En => en(key),
        Language::Fr => fr(key),
        Language::De => de(key),
        Language::It => it(key),
    }
}

fn en(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.title" => "Covid App",
        "app.country" => "Country",
        "app.language" => "Language",
        "sidebar.navigation" => "Navigation",
        "sidebar.dashboard" => "Dashboard",
        "sidebar.countries" => "Countries",
        "sidebar.analytics" => "Analytics",
        "sidebar.dataManagement" => "Data management",
        "sidebar.prediction" => "Prediction",
        "sidebar.logout" => "Log out",
        "login.title" => "Sign in",
        "login.username" => "Username",
        "login.password" => "Password",
        "login.submit" => "Sign in",
        "login.submitting" => "Signing in...",
        "login.failed" => "Login failed",
        "common.loading" => "Loading...",
        "common.retry" => "Retry",
        "common.error" => "Failed to load data. Please try again later.",
        "common.partial" => "Some sections could not be loaded",
        "common.noData" => "No data available",
        "common.results" => "{0} results",
        "common.back" => "Back",
        "dashboard.title" => "Global overview",
        "dashboard.confirmed" => "Confirmed",
        "dashboard.deaths" => "Deaths",
        "dashboard.recovered" => "Recovered",
        "dashboard.new" => "new",
        "dashboard.lastUpdated" => "Last updated {0} at {1}",
        "dashboard.topCountries" => "Most affected countries",
        "countries.title" => "Countries",
        "countries.search" => "Search a country...",
        "country.title" => "Country detail",
        "country.confirmed" => "Total cases",
        "country.newCases" => "New cases",
        "country.deaths" => "Total deaths",
        "country.newDeaths" => "New deaths",
        "country.fatalityRate" => "Fatality rate",
        "country.newCaseRate" => "New-case rate",
        "country.notFound" => "Country not found",
        "analytics.title" => "Analytics",
        "analytics.cases" => "Cases",
        "analytics.deaths" => "Deaths",
        "analytics.recovered" => "Recovered",
        "analytics.top" => "Top 10 countries (total)",
        "analytics.new" => "Top 10 countries (new)",
        "analytics.trend" => "Cumulative trend (30 days)",
        "manage.title" => "Data management",
        "manage.search" => "Filter by country...",
        "manage.country" => "Country",
        "manage.totalCases" => "Total cases",
        "manage.totalDeaths" => "Total deaths",
        "manage.totalRecovered" => "Total recovered",
        "manage.actions" => "Actions",
        "manage.edit" => "Edit",
        "manage.delete" => "Delete",
        "manage.save" => "Save",
        "manage.cancel" => "Cancel",
        "manage.saved" => "Row saved",
        "manage.deleted" => "Row deleted",
        "manage.empty" => "No matching rows",
        "manage.invalidNumber" => "Enter a whole number",
        "prediction.title" => "Death prediction",
        "prediction.subtitle" => "Estimate new deaths from current figures",
        "prediction.region" => "WHO region",
        "prediction.country" => "Country",
        "prediction.selectRegion" => "Select a region",
        "prediction.selectCountry" => "Select a country",
        "prediction.confirmed" => "Confirmed",
        "prediction.deaths" => "Deaths",
        "prediction.recovered" => "Recovered",
        "prediction.active" => "Active",
        "prediction.newCases" => "New cases",
        "prediction.newRecovered" => "New recovered",
        "prediction.date" => "Date",
        "prediction.submit" => "Predict",
        "prediction.submitting" => "Predicting...",
        "prediction.predictedDeaths" => "Predicted new deaths",
        "prediction.deathRate" => "Death rate",
        "prediction.recoveryRate" => "Recovery rate",
        "prediction.emptyTitle" => "No prediction yet",
        "prediction.emptySubtitle" => "Fill in the form to get an estimate",
        "error.prediction" => "Prediction failed. Please try again.",
        "error.metadata" => "Could not load regions",
        "metrics.title" => "Model quality",
        "metrics.date" => "Date",
        "metrics.rmse" => "RMSE",
        "metrics.r2" => "R²",
        _ => return None,
    })
}

fn fr(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.title" => "Covid App",
        "app.country" => "Pays",
        "app.language" => "Langue",
        "sidebar.navigation" => "Navigation",
        "sidebar.dashboard" => "Tableau de bord",
        "sidebar.countries" => "Pays",
        "sidebar.analytics" => "Analyses",
        "sidebar.dataManagement" => "Gestion des données",
        "sidebar.prediction" => "Prédiction",
        "sidebar.logout" => "Déconnexion",
        "login.title" => "Connexion",
        "login.username" => "Nom d'utilisateur",
        "login.password" => "Mot de passe",
        "login.submit" => "Se connecter",
        "login.submitting" => "Connexion...",
        "login.failed" => "Échec de la connexion",
        "common.loading" => "Chargement...",
        "common.retry" => "Réessayer",
        "common.error" => "Impossible de charger les données. Veuillez réessayer plus tard.",
        "common.partial" => "Certaines sections n'ont pas pu être chargées",
        "common.noData" => "Aucune donnée disponible",
        "common.results" => "{0} résultats",
        "common.back" => "Retour",
        "dashboard.title" => "Vue d'ensemble",
        "dashboard.confirmed" => "Cas confirmés",
        "dashboard.deaths" => "Décès",
        "dashboard.recovered" => "Guérisons",
        "dashboard.new" => "nouveaux",
        "dashboard.lastUpdated" => "Mis à jour le {0} à {1}",
        "dashboard.topCountries" => "Pays les plus touchés",
        "countries.title" => "Pays",
        "countries.search" => "Rechercher un pays...",
        "country.title" => "Détail du pays",
        "country.confirmed" => "Cas totaux",
        "country.newCases" => "Nouveaux cas",
        "country.deaths" => "Décès totaux",
        "country.newDeaths" => "Nouveaux décès",
        "country.fatalityRate" => "Taux de létalité",
        "country.newCaseRate" => "Taux de nouveaux cas",
        "country.notFound" => "Pays introuvable",
        "analytics.title" => "Analyses",
        "analytics.cases" => "Cas",
        "analytics.deaths" => "Décès",
        "analytics.recovered" => "Guérisons",
        "analytics.top" => "Top 10 des pays (total)",
        "analytics.new" => "Top 10 des pays (nouveaux)",
        "analytics.trend" => "Tendance cumulée (30 jours)",
        "manage.title" => "Gestion des données",
        "manage.search" => "Filtrer par pays...",
        "manage.country" => "Pays",
        "manage.totalCases" => "Cas totaux",
        "manage.totalDeaths" => "Décès totaux",
        "manage.totalRecovered" => "Guérisons totales",
        "manage.actions" => "Actions",
        "manage.edit" => "Modifier",
        "manage.delete" => "Supprimer",
        "manage.save" => "Enregistrer",
        "manage.cancel" => "Annuler",
        "manage.saved" => "Ligne enregistrée",
        "manage.deleted" => "Ligne supprimée",
        "manage.empty" => "Aucune ligne ne correspond",
        "manage.invalidNumber" => "Saisissez un nombre entier",
        "prediction.title" => "Prédiction des décès",
        "prediction.subtitle" => "Estimer les nouveaux décès à partir des chiffres actuels",
        "prediction.region" => "Région OMS",
        "prediction.country" => "Pays",
        "prediction.selectRegion" => "Choisir une région",
        "prediction.selectCountry" => "Choisir un pays",
        "prediction.confirmed" => "Confirmés",
        "prediction.deaths" => "Décès",
        "prediction.recovered" => "Guérisons",
        "prediction.active" => "Actifs",
        "prediction.newCases" => "Nouveaux cas",
        "prediction.newRecovered" => "Nouvelles guérisons",
        "prediction.date" => "Date",
        "prediction.submit" => "Prédire",
        "prediction.submitting" => "Prédiction en cours...",
        "prediction.predictedDeaths" => "Nouveaux décès prédits",
        "prediction.deathRate" => "Taux de décès",
        "prediction.recoveryRate" => "Taux de guérison",
        "prediction.emptyTitle" => "Aucune prédiction",
        "prediction.emptySubtitle" => "Remplissez le formulaire pour obtenir une estimation",
        "error.prediction" => "La prédiction a échoué. Veuillez réessayer.",
        "error.metadata" => "Impossible de charger les régions",
        "metrics.title" => "Qualité du modèle",
        "metrics.date" => "Date",
        "metrics.rmse" => "RMSE",
        "metrics.r2" => "R²",
        _ => return None,
    })
}

fn de(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.country" => "Land",
        "app.language" => "Sprache",
        "sidebar.dashboard" => "Übersicht",
        "sidebar.countries" => "Länder",
        "sidebar.analytics" => "Analysen",
        "sidebar.dataManagement" => "Datenverwaltung",
        "sidebar.prediction" => "Vorhersage",
        "sidebar.logout" => "Abmelden",
        "login.title" => "Anmelden",
        "login.username" => "Benutzername",
        "login.password" => "Passwort",
        "login.submit" => "Anmelden",
        "login.submitting" => "Anmeldung...",
        "login.failed" => "Anmeldung fehlgeschlagen",
        "common.loading" => "Wird geladen...",
        "common.retry" => "Erneut versuchen",
        "common.error" => "Daten konnten nicht geladen werden. Bitte später erneut versuchen.",
        "common.noData" => "Keine Daten verfügbar",
        "common.back" => "Zurück",
        "prediction.title" => "Todesfall-Vorhersage",
        "prediction.subtitle" => "Neue Todesfälle aus aktuellen Zahlen schätzen",
        "prediction.region" => "WHO-Region",
        "prediction.country" => "Land",
        "prediction.selectRegion" => "Region wählen",
        "prediction.selectCountry" => "Land wählen",
        "prediction.confirmed" => "Bestätigt",
        "prediction.deaths" => "Todesfälle",
        "prediction.recovered" => "Genesen",
        "prediction.active" => "Aktiv",
        "prediction.newCases" => "Neue Fälle",
        "prediction.newRecovered" => "Neu genesen",
        "prediction.date" => "Datum",
        "prediction.submit" => "Vorhersagen",
        "prediction.submitting" => "Wird berechnet...",
        "prediction.predictedDeaths" => "Vorhergesagte neue Todesfälle",
        "prediction.deathRate" => "Sterberate",
        "prediction.recoveryRate" => "Genesungsrate",
        "prediction.emptyTitle" => "Noch keine Vorhersage",
        "prediction.emptySubtitle" => "Formular ausfüllen, um eine Schätzung zu erhalten",
        "error.prediction" => "Vorhersage fehlgeschlagen. Bitte erneut versuchen.",
        "error.metadata" => "Regionen konnten nicht geladen werden",
        "metrics.title" => "Modellqualität",
        "metrics.date" => "Datum",
        _ => return None,
    })
}

fn it(key: &str) -> Option<&'static str> {
    Some(match key {
        "app.country" => "Paese",
        "app.language" => "Lingua",
        "sidebar.dashboard" => "Panoramica",
        "sidebar.countries" => "Paesi",
        "sidebar.analytics" => "Analisi",
        "sidebar.dataManagement" => "Gestione dati",
        "sidebar.prediction" => "Previsione",
        "sidebar.logout" => "Esci",
        "login.title" => "Accedi",
        "login.username" => "Nome utente",
        "login.password" => "Password",
        "login.submit" => "Accedi",
        "login.submitting" => "Accesso...",
        "login.failed" => "Accesso non riuscito",
        "common.loading" => "Caricamento...",
        "common.retry" => "Riprova",
        "common.error" => "Impossibile caricare i dati. Riprova più tardi.",
        "common.noData" => "Nessun dato disponibile",
        "common.back" => "Indietro",
        "prediction.title" => "Previsione dei decessi",
        "prediction.subtitle" => "Stima dei nuovi decessi dai dati attuali",
        "prediction.region" => "Regione OMS",
        "prediction.country" => "Paese",
        "prediction.selectRegion" => "Seleziona una regione",
        "prediction.selectCountry" => "Seleziona un paese",
        "prediction.confirmed" => "Confermati",
        "prediction.deaths" => "Decessi",
        "prediction.recovered" => "Guariti",
        "prediction.active" => "Attivi",
        "prediction.newCases" => "Nuovi casi",
        "prediction.newRecovered" => "Nuovi guariti",
        "prediction.date" => "Data",
        "prediction.submit" => "Prevedi",
        "prediction.submitting" => "Calcolo in corso...",
        "prediction.predictedDeaths" => "Nuovi decessi previsti",
        "prediction.deathRate" => "Tasso di mortalità",
        "prediction.recoveryRate" => "Tasso di guarigione",
        "prediction.emptyTitle" => "Nessuna previsione",
        "prediction.emptySubtitle" => "Compila il modulo per ottenere una stima",
        "error.prediction" => "Previsione non riuscita. Riprova.",
        "error.metadata" => "Impossibile caricare le regioni",
        "metrics.title" => "Qualità del modello",
        "metrics.date" => "Data",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_chain() {
        assert_eq!(translate(Language::De, "sidebar.logout"), "Abmelden");
        // German catalog has no analytics entries: falls back to French
        assert_eq!(translate(Language::De, "analytics.top"), "Top 10 des pays (total)");
        assert_eq!(translate(Language::It, "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_english_and_french_catalogs_match() {
        let keys = [
            "sidebar.dashboard",
            "prediction.submitting",
            "error.prediction",
            "manage.totalRecovered",
            "manage.invalidNumber",
            "metrics.r2",
        ];
        for key in keys {
            assert!(en(key).is_some(), "en missing {}", key);
            assert!(fr(key).is_some(), "fr missing {}", key);
        }
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            translate_with(Language::En, "dashboard.lastUpdated", &["2024-01-02", "10:00"]),
            "Last updated 2024-01-02 at 10:00"
        );
        assert_eq!(translate_with(Language::Fr, "common.results", &["3"]), "3 résultats");
    }

    #[test]
    fn test_language_defaults() {
        assert_eq!(Language::default_for(CountryCode::Usa), Language::En);
        assert_eq!(Language::options_for(CountryCode::Ch).len(), 3);
        assert_eq!("IT".parse::<Language>(), Ok(Language::It));
    }
}
