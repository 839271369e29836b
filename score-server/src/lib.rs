use std::sync::Arc;
use warp::Filter;

use crate::session::GameSession;
use crate::websocket::ConnectionManager;
use score_types::GameAction;

pub mod config;
pub mod save_worker;
pub mod session;
pub mod websocket;

const MAX_ACTION_BODY_BYTES: u64 = 16 * 1024;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    session: Arc<GameSession>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let session_filter = warp::any().map({
        let session = session.clone();
        move || session.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter.clone())
        .and(session_filter.clone())
        .map(|ws: warp::ws::Ws, conn_mgr, session| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, conn_mgr, session))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Current board and control flags
    let game_view = warp::path!("game")
        .and(warp::get())
        .and(session_filter.clone())
        .and_then(handle_game_view_request);

    let actions = warp::path!("game" / "actions")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_ACTION_BODY_BYTES))
        .and(warp::body::json())
        .and(session_filter.clone())
        .and_then(handle_action_request);

    let undo = warp::path!("game" / "undo")
        .and(warp::post())
        .and(session_filter.clone())
        .and_then(handle_undo_request);

    let redo = warp::path!("game" / "redo")
        .and(warp::post())
        .and(session_filter.clone())
        .and_then(handle_redo_request);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);

    websocket
        .or(health)
        .or(game_view)
        .or(actions)
        .or(undo)
        .or(redo)
        .with(cors)
        .with(warp::log("scorekeeper"))
}

async fn handle_game_view_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&session.view().await))
}

async fn handle_action_request(
    action: GameAction,
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = session.apply(action).await;
    Ok(warp::reply::json(&outcome.view))
}

async fn handle_undo_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = session.undo().await;
    Ok(warp::reply::json(&outcome.view))
}

async fn handle_redo_request(
    session: Arc<GameSession>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let outcome = session.redo().await;
    Ok(warp::reply::json(&outcome.view))
}
