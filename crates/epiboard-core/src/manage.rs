//! Data management driver: the table model plus its CRUD calls

use crate::api::ApiClient;
use epiboard_types::{ApiError, ApiErrorKind, ApiResult, CountryRow, ManageTable};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct DataManager {
    table: ManageTable,
}

impl DataManager {
    /// Fetch the list once; sorting and searching stay local afterwards
    pub async fn load(api: &ApiClient) -> ApiResult<Self> {
        let rows = api.manage_list().await?;
        Ok(Self {
            table: ManageTable::new(rows),
        })
    }

    pub fn table(&self) -> &ManageTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ManageTable {
        &mut self.table
    }

    /// Send the draft as a full replace; the server's copy replaces the row.
    /// On failure, or while a count field is invalid, the draft stays open.
    pub async fn save(&mut self, api: &ApiClient) -> ApiResult<CountryRow> {
        let draft = self
            .table
            .draft()
            .ok_or_else(|| ApiError::new(ApiErrorKind::Validation, "No row is being edited"))?;
        let row = draft.to_row().ok_or_else(|| {
            let fields: Vec<String> = draft
                .invalid_fields()
                .iter()
                .map(|f| format!("{:?}", f))
                .collect();
            ApiError::new(
                ApiErrorKind::Validation,
                format!("Invalid number in {}", fields.join(", ")),
            )
        })?;
        let saved = api.manage_update(&row).await?;
        info!(id = %saved.id, country = %saved.country, "Row saved");
        self.table.apply_saved(saved.clone());
        Ok(saved)
    }

    /// Backend `DELETE`; the row leaves the table only once the server confirmed
    pub async fn delete(&mut self, api: &ApiClient, id: &str) -> ApiResult<Option<CountryRow>> {
        api.manage_delete(id).await?;
        info!(id, "Row deleted");
        Ok(self.table.remove(id))
    }
}
