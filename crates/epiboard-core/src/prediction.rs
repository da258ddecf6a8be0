//! Prediction driver: feeds the form state machine from the API

use crate::api::ApiClient;
use epiboard_types::PredictionForm;
use tracing::{debug, warn};

/// Populate the region/country vocabulary
pub async fn load_metadata(api: &ApiClient, form: &mut PredictionForm) {
    match api.metadata().await {
        Ok(metadata) => {
            debug!(regions = metadata.who_regions.len(), "Metadata loaded");
            form.set_metadata(metadata);
        }
        Err(e) => {
            warn!(error = %e, "Metadata unavailable");
            form.metadata_failed(e.message);
        }
    }
}

/// Submit the current record. Returns false when the form was not submittable.
pub async fn submit(api: &ApiClient, form: &mut PredictionForm) -> bool {
    let Some(row) = form.begin_submit() else {
        return false;
    };
    let outcome = api.predict(&row).await;
    if let Err(e) = &outcome {
        warn!(error = %e, country = %row.country, "Prediction failed");
    }
    form.finish_submit(outcome);
    true
}
