use axum::{extract::State, Json};
use chrono::Local;

use crate::errors::AppError;
use crate::state::AppState;
use crate::stats::{compute_statistics, StatisticsReport};

/// GET /api/v1/stats
pub async fn handle_get_stats(
    State(state): State<AppState>,
) -> Result<Json<StatisticsReport>, AppError> {
    let records = state.store.snapshot().await;
    let report = compute_statistics(
        &records,
        Local::now().date_naive(),
        state.config.stats_top_n,
    );
    Ok(Json(report))
}
