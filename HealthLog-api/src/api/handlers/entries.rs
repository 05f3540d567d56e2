use axum::extract::{Json, Path, Query, State};
use tracing::{info, instrument};

use crate::api::error::ApiResult;
use crate::api::routes::AppState;
use crate::entities::common::{ErrorResponse, SuccessResponse};
use crate::entities::entry::{
    DeleteEntryParams, Entry, EntryRequest, EntryUpdateRequest, ListEntriesParams,
};

/// List entries, newest first
#[utoipa::path(
    get,
    path = "/api/entries",
    params(ListEntriesParams),
    responses(
        (status = 200, description = "Entries ordered by date, newest first", body = [Entry]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListEntriesParams>,
) -> ApiResult<Json<Vec<Entry>>> {
    let entries = state
        .entries
        .list_entries(params.skip(), Some(params.take()))
        .await?;

    info!("Returning {} entries", entries.len());
    Ok(Json(entries.into_iter().map(Entry::from).collect()))
}

/// Get a single entry; responds with `null` when it does not exist
#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    params(
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "The entry, or null when there is none", body = Option<Entry>),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Option<Entry>>> {
    let entry = state.entries.get_entry(id).await?;
    Ok(Json(entry.map(Entry::from)))
}

/// Create a new entry
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = EntryRequest,
    responses(
        (status = 200, description = "Entry created", body = Entry),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, request))]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryRequest>,
) -> ApiResult<Json<Entry>> {
    let entry = state.entries.create_entry(request.into()).await?;

    info!("Entry created with ID: {}", entry.id);
    Ok(Json(entry.into()))
}

/// Replace every field of an entry; fields left out become null
#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    params(
        ("id" = i64, Path, description = "Entry ID")
    ),
    request_body = EntryRequest,
    responses(
        (status = 200, description = "Entry replaced", body = Entry),
        (status = 400, description = "Invalid date", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, request))]
pub async fn replace_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EntryRequest>,
) -> ApiResult<Json<Entry>> {
    let entry = state.entries.replace_entry(id, request.into()).await?;

    info!("Entry replaced: {}", entry.id);
    Ok(Json(entry.into()))
}

/// Update the entry named by `id` in the body
#[utoipa::path(
    put,
    path = "/api/entries/update",
    request_body = EntryUpdateRequest,
    responses(
        (status = 200, description = "Entry updated", body = Entry),
        (status = 400, description = "Missing or invalid date", body = ErrorResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state, request))]
pub async fn update_entry(
    State(state): State<AppState>,
    Json(request): Json<EntryUpdateRequest>,
) -> ApiResult<Json<Entry>> {
    let entry = state.entries.update_entry(request.into()).await?;

    info!("Entry updated: {}", entry.id);
    Ok(Json(entry.into()))
}

/// Delete an entry by path id
#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(
        ("id" = i64, Path, description = "Entry ID")
    ),
    responses(
        (status = 200, description = "Entry deleted", body = SuccessResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SuccessResponse>> {
    state.entries.delete_entry(id).await?;

    info!("Entry deleted: {}", id);
    Ok(Json(SuccessResponse::ok()))
}

/// Delete an entry named by the `id` query parameter
#[utoipa::path(
    delete,
    path = "/api/entries/delete",
    params(DeleteEntryParams),
    responses(
        (status = 200, description = "Entry deleted", body = SuccessResponse),
        (status = 404, description = "Entry not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "entries"
)]
#[instrument(skip(state))]
pub async fn delete_entry_by_query(
    State(state): State<AppState>,
    Query(params): Query<DeleteEntryParams>,
) -> ApiResult<Json<SuccessResponse>> {
    state.entries.delete_entry(params.id).await?;

    info!("Entry deleted: {}", params.id);
    Ok(Json(SuccessResponse::ok()))
}
