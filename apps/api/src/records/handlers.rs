use axum::{extract::State, http::StatusCode, Json};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::scalar::optional_number;
use crate::models::{EducationEntry, RecordId, RecordKey, ResumeRecord, StoredRecord, WorkEntry};
use crate::records::codec::format_history;
use crate::records::normalize::{normalize, ResumeForm};
use crate::records::search::{export_request, filter_records, ExportRequest, FilterRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(flatten)]
    pub filter: FilterRequest,
    /// 0 = unlimited; defaults to the configured list limit.
    #[serde(default, deserialize_with = "optional_number")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Number of records matching the filter, before the limit.
    pub count: usize,
    pub data: Vec<StoredRecord>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub record: StoredRecord,
    /// Existing records sharing the new record's (name, entry time) key.
    pub key_collisions: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub ids: Vec<RecordId>,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailResponse {
    pub record: StoredRecord,
    /// `None` when the stored field is not structured.
    pub education: Option<Vec<EducationEntry>>,
    pub work: Option<Vec<WorkEntry>>,
    pub education_text: String,
    pub work_text: String,
    pub phone_valid: bool,
    pub email_valid: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteByKeyResponse {
    pub deleted: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let records = state.store.snapshot().await;
    debug!(
        query = %params.filter.query,
        structured = params.filter.has_structured_filters(),
        "Filtering {} resumes",
        records.len()
    );
    let matched = filter_records(&records, &params.filter, Local::now().date_naive());
    let count = matched.len();
    let limit = params.limit.unwrap_or(state.config.list_limit);
    let take = if limit == 0 { count } else { limit };
    let data = matched.into_iter().take(take).cloned().collect();
    Ok(Json(ListResponse { count, data }))
}

/// POST /api/v1/resumes
pub async fn handle_submit(
    State(state): State<AppState>,
    AppJson(form): AppJson<ResumeForm>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let inserted = state.store.insert(normalize(&form)).await;
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            record: inserted.record,
            key_collisions: inserted.key_collisions,
        }),
    ))
}

/// POST /api/v1/resumes/import
///
/// Accepts records already in the flat storage shape, e.g. the output of the
/// upload pipeline.
pub async fn handle_import(
    State(state): State<AppState>,
    AppJson(records): AppJson<Vec<ResumeRecord>>,
) -> Result<(StatusCode, Json<ImportResponse>), AppError> {
    if records.is_empty() {
        return Err(AppError::Validation("No records to import".to_string()));
    }
    let mut ids = Vec::with_capacity(records.len());
    for record in records {
        ids.push(state.store.insert(record).await.record.id);
    }
    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            imported: ids.len(),
            ids,
        }),
    ))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ResumeDetailResponse>, AppError> {
    let stored = state
        .store
        .get(RecordId(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    let record = &stored.record;

    Ok(Json(ResumeDetailResponse {
        education: record.education_entries().into_entries(),
        work: record.work_entries().into_entries(),
        education_text: format_history::<EducationEntry>(&record.education_history),
        work_text: format_history::<WorkEntry>(&record.work_history),
        phone_valid: record.phone_is_valid(),
        email_valid: record.email_is_valid(),
        record: stored,
    }))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_replace(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(form): AppJson<ResumeForm>,
) -> Result<Json<StoredRecord>, AppError> {
    let replaced = state
        .store
        .replace(RecordId(id), normalize(&form))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(replaced))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .delete(RecordId(id))
        .await
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/resumes?name=&entry_time=
///
/// Legacy lookup by (name, entry time). Removes every record sharing the key.
pub async fn handle_delete_by_key(
    State(state): State<AppState>,
    AppQuery(key): AppQuery<RecordKey>,
) -> Result<Json<DeleteByKeyResponse>, AppError> {
    if key.name.trim().is_empty() || key.entry_time.trim().is_empty() {
        return Err(AppError::Validation(
            "name and entry_time are both required".to_string(),
        ));
    }
    let deleted = state.store.delete_by_key(&key).await;
    if deleted == 0 {
        return Err(AppError::NotFound(format!(
            "No resume for ({}, {})",
            key.name, key.entry_time
        )));
    }
    Ok(Json(DeleteByKeyResponse { deleted }))
}

/// POST /api/v1/resumes/export
///
/// Returns the payload the spreadsheet exporter consumes for the current filter.
pub async fn handle_export(
    State(state): State<AppState>,
    AppJson(filter): AppJson<FilterRequest>,
) -> Result<Json<ExportRequest>, AppError> {
    let records = state.store.snapshot().await;
    Ok(Json(export_request(
        &records,
        &filter,
        Local::now().date_naive(),
    )))
}
