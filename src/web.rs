use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::board::Position;
use crate::config::{ConfigError, GameConfig};
use crate::game::{GameController, SeparationReport};

#[derive(Clone)]
pub struct AppState {
    game: Arc<Mutex<GameController>>,
    config: Arc<GameConfig>,
}

#[derive(Serialize, Deserialize)]
pub struct ClickRequest {
    pub x: i64,
    pub y: i64,
}

#[derive(Serialize, Deserialize)]
pub struct GameResponse {
    pub board: Vec<String>,
    pub width: usize,
    pub height: usize,
    pub current_player: String,
    pub phase: String,
    pub selected: Option<Position>,
    pub legal_targets: Vec<Position>,
    pub winner: Option<String>,
    pub turn: usize,
    pub report: Option<SeparationReport>,
    pub message: String,
}

impl AppState {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let game = GameController::new(&config)?;
        Ok(AppState {
            game: Arc::new(Mutex::new(game)),
            config: Arc::new(config),
        })
    }

    fn lock(&self) -> MutexGuard<'_, GameController> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn game_response(game: &GameController, message: String) -> GameResponse {
    let state = game.state();
    let (width, height) = state.board().dimensions();

    GameResponse {
        board: state.board().rows(),
        width,
        height,
        current_player: state.current_player().to_string(),
        phase: state.phase().name().to_string(),
        selected: state.selected_position(),
        legal_targets: state.legal_targets(),
        winner: state.winner().map(|side| side.to_string()),
        turn: state.turns(),
        report: state.latest_report().copied(),
        message,
    }
}

async fn new_game(State(app_state): State<AppState>) -> Response {
    let mut game = app_state.lock();
    // The stored config was validated when the server started.
    match GameController::new(&app_state.config) {
        Ok(fresh) => *game = fresh,
        Err(err) => {
            return (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    }

    let message = format!("New game. {} to move", game.current_player());
    Json(game_response(&game, message)).into_response()
}

async fn click(State(app_state): State<AppState>, Json(req): Json<ClickRequest>) -> Response {
    let mut game = app_state.lock();
    let outcome = game.cell_clicked(req.x, req.y);
    Json(game_response(&game, outcome.to_string())).into_response()
}

async fn get_game_state(State(app_state): State<AppState>) -> Json<GameResponse> {
    let game = app_state.lock();
    Json(game_response(&game, String::new()))
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/new-game", post(new_game))
        .route("/api/click", post(click))
        .route("/api/game-state", get(get_game_state))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

pub async fn run_server(
    addr: SocketAddr,
    config: GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Web server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
