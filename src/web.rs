use std::sync::Arc;

use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::controller::{PageController, PageState};
use crate::geolocation::ReportedPosition;
use crate::models::{Coordinate, WeatherSnapshot};
use crate::view::HtmlPage;
use crate::{Result, WeatherPageError};

/// State shared by every handler
pub struct AppState {
    pub controller: PageController<HtmlPage>,
    /// Used by `/locate` when the browser reports no position
    pub fallback: Option<Coordinate>,
}

impl AppState {
    pub fn new(controller: PageController<HtmlPage>, fallback: Option<Coordinate>) -> Self {
        Self {
            controller,
            fallback,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let controller = PageController::from_config(config, HtmlPage::new())?;
        Ok(Self::new(controller, config.fallback_location()))
    }
}

type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct LocateParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Reason given by the browser when it could not locate the device
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub city: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/locate", get(locate))
        .route("/search", post(search))
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/state", get(get_state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    state.controller.init().await;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Weather page running at http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn index(State(state): State<SharedState>) -> Html<String> {
    Html(state.controller.with_view(|page| page.document()).await)
}

async fn locate(
    State(state): State<SharedState>,
    Query(params): Query<LocateParams>,
) -> Response {
    let reported = match (params.lat, params.lon) {
        (Some(lat), Some(lon)) => match Coordinate::checked(lat, lon) {
            Ok(coordinate) => Some(coordinate),
            Err(err) => return (StatusCode::BAD_REQUEST, err.user_message()).into_response(),
        },
        _ => None,
    };
    let position = ReportedPosition {
        reported,
        denial: params.error,
        fallback: state.fallback,
    };

    let result = state.controller.load_current_location(&position).await;
    page_response(&state, result.err()).await
}

async fn search(State(state): State<SharedState>, Form(form): Form<SearchForm>) -> Response {
    state
        .controller
        .with_view(|page| page.set_search_input(form.city))
        .await;
    let result = state.controller.submit_search().await;
    page_response(&state, result.err()).await
}

async fn get_snapshot(
    State(state): State<SharedState>,
) -> std::result::Result<Json<WeatherSnapshot>, StatusCode> {
    state
        .controller
        .last_snapshot()
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_state(State(state): State<SharedState>) -> Json<PageState> {
    Json(state.controller.state().await)
}

/// The current document, with a status reflecting how the flow ended
async fn page_response(state: &AppState, error: Option<WeatherPageError>) -> Response {
    let status = error.as_ref().map_or(StatusCode::OK, status_for);
    if let Some(err) = &error {
        warn!(%status, "Responding with notice: {}", err);
    }
    let document = state.controller.with_view(|page| page.document()).await;
    (status, Html(document)).into_response()
}

fn status_for(err: &WeatherPageError) -> StatusCode {
    match err {
        WeatherPageError::HttpStatus { .. }
        | WeatherPageError::Transport(_)
        | WeatherPageError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        WeatherPageError::NoResults { .. } => StatusCode::NOT_FOUND,
        WeatherPageError::Validation { .. } => StatusCode::BAD_REQUEST,
        WeatherPageError::GeolocationDenied(_) => StatusCode::OK,
        WeatherPageError::Config { .. } | WeatherPageError::Io { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
