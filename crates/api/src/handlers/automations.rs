use axum::{extract::State, Json};
use nodes::AutomationCatalog;

use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Json<AutomationCatalog> {
    Json(state.backend.automations().await)
}
