use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use ruleta_core::{Game, PersistenceError, SpinLedger};
use ruleta_shared::{
    ApiError, ColorsResponse, HealthResponse, HistoryResponse, ResetResponse, SpinEntry,
    SpinResponse, StatisticsResponse,
};

pub mod config;

pub use config::ServerConfig;

type AppState<L> = Arc<Game<L>>;

/// `ApiError` rendered as `{success: false, error}` with its status code.
pub struct AppError(ApiError);

impl From<PersistenceError> for AppError {
    fn from(e: PersistenceError) -> Self {
        AppError(ApiError::Persistence(e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0.to_response())).into_response()
    }
}

async fn route_spin<L: SpinLedger>(
    State(game): State<AppState<L>>,
) -> Result<Json<SpinResponse>, AppError> {
    let (record, statistics) = game.spin_with_statistics().await?;
    Ok(Json(SpinResponse {
        success: true,
        result: SpinEntry::from(&record),
        statistics,
    }))
}

async fn route_history<L: SpinLedger>(
    State(game): State<AppState<L>>,
) -> Result<Json<HistoryResponse>, AppError> {
    let (history, statistics) = game.history_with_statistics().await?;
    Ok(Json(HistoryResponse {
        success: true,
        history: history.iter().map(SpinEntry::from).collect(),
        statistics,
    }))
}

async fn route_statistics<L: SpinLedger>(
    State(game): State<AppState<L>>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let statistics = game.statistics().await?;
    Ok(Json(StatisticsResponse {
        success: true,
        statistics,
    }))
}

async fn route_reset<L: SpinLedger>(
    State(game): State<AppState<L>>,
) -> Result<Json<ResetResponse>, AppError> {
    game.reset().await?;
    Ok(Json(ResetResponse {
        success: true,
        message: "Juego reiniciado".to_string(),
    }))
}

async fn route_colors() -> Json<ColorsResponse> {
    Json(ColorsResponse::table())
}

async fn route_health() -> Json<HealthResponse> {
    let endpoints: BTreeMap<String, String> = [
        ("POST /api/spin", "Girar la ruleta"),
        ("GET /api/history", "Obtener historial"),
        ("GET /api/statistics", "Obtener estadísticas"),
        ("POST /api/reset", "Reiniciar juego"),
        ("GET /api/colors", "Obtener información de colores"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Servidor de Ruleta funcionando".to_string(),
        endpoints,
    })
}

pub fn router<L: SpinLedger>(game: AppState<L>) -> Router {
    Router::new()
        .route("/api/spin", post(route_spin::<L>))
        .route("/api/history", get(route_history::<L>))
        .route("/api/statistics", get(route_statistics::<L>))
        .route("/api/reset", post(route_reset::<L>))
        .route("/api/colors", get(route_colors))
        .route("/health", get(route_health))
        .with_state(game)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
