use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use engine::{Graph, ValidationResult};

use crate::backend::SimulationRun;
use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SimulateParams {
    /// Refuse to simulate a graph that fails validation.
    #[serde(default)]
    pub strict: bool,
}

pub async fn validate(
    State(state): State<AppState>,
    Json(graph): Json<Graph>,
) -> Json<ValidationResult> {
    Json(state.backend.validate(&graph).await)
}

pub async fn simulate(
    State(state): State<AppState>,
    Query(params): Query<SimulateParams>,
    Json(graph): Json<Graph>,
) -> Result<Json<SimulationRun>, ApiError> {
    if params.strict {
        let validation = state.backend.validate(&graph).await;
        if !validation.ok {
            warn!(errors = validation.errors.len(), "strict simulation rejected");
            return Err(ApiError::Rejected(validation));
        }
    }

    Ok(Json(state.backend.simulate(&graph).await))
}
