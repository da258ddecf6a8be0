//! Data management - editable country table

use crate::api::{delete_country, fetch_manage_rows, update_country};
use crate::components::{use_toast, ErrorPanel};
use crate::i18n::use_i18n;
use epiboard_types::format::format_count;
use epiboard_types::{CountryRow, DraftField, LoadState, ManageTable, SortColumn};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Row identity for keyed rendering; a saved row gets a new key and re-renders
type RowKey = (String, String, i64, i64, i64);

fn row_key(row: &CountryRow) -> RowKey {
    (
        row.id.clone(),
        row.country.clone(),
        row.total_cases,
        row.total_deaths,
        row.total_recovered,
    )
}

#[component]
pub fn DataManagement() -> impl IntoView {
    let i18n = use_i18n();
    let toast = use_toast();
    let table = RwSignal::new(ManageTable::default());
    let state = RwSignal::new(LoadState::<()>::Loading);

    let load = move || {
        state.set(LoadState::Loading);
        spawn_local(async move {
            match fetch_manage_rows().await {
                Ok(rows) => {
                    table.update(|t| t.set_rows(rows));
                    state.set(LoadState::Loaded(()));
                }
                Err(e) => state.set(LoadState::Failed(e.message)),
            }
        });
    };
    load();

    let save = move || {
        let Some(row) = table.with_untracked(|t| t.draft_row()) else {
            return;
        };
        spawn_local(async move {
            match update_country(&row).await {
                Ok(saved) => {
                    table.update(|t| t.apply_saved(saved));
                    toast.success(i18n.t("manage.saved"));
                }
                Err(e) => toast.error(e.message),
            }
        });
    };

    let delete = move |id: String| {
        spawn_local(async move {
            match delete_country(&id).await {
                Ok(()) => {
                    table.update(|t| {
                        t.remove(&id);
                    });
                    toast.success(i18n.t("manage.deleted"));
                }
                Err(e) => toast.error(e.message),
            }
        });
    };

    view! {
        <div class="page data-management-page">
            <div class="page-header">
                <h2 class="page-title">{move || i18n.t("manage.title")}</h2>
                <input
                    type="search"
                    class="search-input"
                    placeholder=move || i18n.t("manage.search")
                    prop:value=move || table.with(|t| t.search.clone())
                    on:input=move |e| table.update(|t| t.set_search(event_target_value(&e)))
                />
            </div>

            {move || match state.get() {
                LoadState::Loading => {
                    view! { <div class="loading">{i18n.t("common.loading")}</div> }.into_any()
                }
                LoadState::Failed(message) => {
                    view! { <ErrorPanel message=message on_retry=move || load() /> }.into_any()
                }
                LoadState::Loaded(()) => {
                    view! {
                        <table class="data-table">
                            <thead>
                                <tr>
                                    {SortColumn::ALL
                                        .iter()
                                        .map(|col| {
                                            let col = *col;
                                            view! {
                                                <th
                                                    class="sortable"
                                                    on:click=move |_| table.update(|t| t.sort_by(col))
                                                >
                                                    {move || i18n.t(col.label_key())}
                                                    " "
                                                    {move || {
                                                        table
                                                            .with(|t| {
                                                                (t.sort.column == col)
                                                                    .then(|| t.sort.direction.indicator())
                                                            })
                                                            .unwrap_or("")
                                                    }}
                                                </th>
                                            }
                                        })
                                        .collect_view()}
                                    <th>{move || i18n.t("manage.actions")}</th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=move || table.with(|t| t.visible_rows())
                                    key=row_key
                                    children=move |row| {
                                        view! {
                                            <ManageRow
                                                row=row
                                                table=table
                                                on_save=Callback::new(move |_| save())
                                                on_delete=Callback::new(move |id| delete(id))
                                            />
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                        <Show when=move || table.with(|t| t.visible_rows().is_empty())>
                            <p class="hint">{move || i18n.t("manage.empty")}</p>
                        </Show>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn ManageRow(
    row: CountryRow,
    table: RwSignal<ManageTable>,
    on_save: Callback<()>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let i18n = use_i18n();
    let id = StoredValue::new(row.id.clone());
    let editing = Memo::new(move |_| table.with(|t| id.with_value(|id| t.is_editing(id))));

    let draft_value = move |field: DraftField| {
        table.with(|t| {
            t.draft()
                .map(|d| d.value(field).to_string())
                .unwrap_or_default()
        })
    };
    let invalid = move |field: DraftField| {
        table.with(|t| t.draft().is_some_and(|d| !d.is_valid(field)))
    };
    let input = move |field: DraftField, kind: &'static str| {
        view! {
            <td>
                <input
                    type=kind
                    class=move || {
                        if invalid(field) { "cell-input cell-input--invalid" } else { "cell-input" }
                    }
                    title=move || invalid(field).then(|| i18n.t("manage.invalidNumber"))
                    prop:value=move || draft_value(field)
                    on:input=move |e| table.update(|t| t.update_draft(field, &event_target_value(&e)))
                />
            </td>
        }
    };

    move || {
        if editing.get() {
            view! {
                <tr class="row-editing">
                    {input(DraftField::Country, "text")}
                    {input(DraftField::TotalCases, "number")}
                    {input(DraftField::TotalDeaths, "number")}
                    {input(DraftField::TotalRecovered, "number")}
                    <td class="row-actions">
                        <button
                            class="btn btn-primary"
                            disabled=move || table.with(|t| !t.can_save())
                            on:click=move |_| on_save.run(())
                        >
                            {move || i18n.t("manage.save")}
                        </button>
                        <button class="btn btn-secondary" on:click=move |_| table.update(|t| t.cancel_edit())>
                            {move || i18n.t("manage.cancel")}
                        </button>
                    </td>
                </tr>
            }
                .into_any()
        } else {
            view! {
                <tr>
                    <td>{row.country.clone()}</td>
                    <td>{format_count(row.total_cases as f64)}</td>
                    <td>{format_count(row.total_deaths as f64)}</td>
                    <td>{format_count(row.total_recovered as f64)}</td>
                    <td class="row-actions">
                        <button
                            class="btn btn-secondary"
                            on:click=move |_| {
                                table.update(|t| {
                                    id.with_value(|id| t.begin_edit(id));
                                })
                            }
                        >
                            {move || i18n.t("manage.edit")}
                        </button>
                        <button
                            class="btn btn-danger"
                            on:click=move |_| on_delete.run(id.get_value())
                        >
                            {move || i18n.t("manage.delete")}
                        </button>
                    </td>
                </tr>
            }
                .into_any()
        }
    }
}
