//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{
    CommandResponse, DurationRequest, ErrorResponse, HealthResponse, StatusResponse,
};
use crate::{
    coordinator::{SlotId, SlotSnapshot, TimerCoordinator},
    error::CoordinatorError,
    model::{preset, Preset, PRESETS},
    state::AppState,
};

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn coordinator_error(e: CoordinatorError) -> ApiError {
    let status = match e {
        CoordinatorError::CapacityExceeded { .. } => StatusCode::CONFLICT,
        CoordinatorError::UnknownSlot(_) => StatusCode::NOT_FOUND,
    };
    warn!("Request rejected: {}", e);
    (status, Json(ErrorResponse::new(e.to_string())))
}

fn internal_error(e: String) -> ApiError {
    error!("Internal error: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e)))
}

/// Run a slot command and answer with the slot's resulting snapshot
fn run_command<F>(
    state: &AppState,
    id: SlotId,
    verb: &str,
    command: F,
) -> Result<Json<CommandResponse>, ApiError>
where
    F: FnOnce(&mut TimerCoordinator) -> Result<bool, CoordinatorError>,
{
    let action = format!("{} timer {}", verb, id);
    let (applied, snapshot) = state
        .command(&action, |coordinator| {
            let applied = command(coordinator)?;
            Ok::<_, CoordinatorError>((applied, coordinator.slot_snapshot(id)?))
        })
        .map_err(internal_error)?
        .map_err(coordinator_error)?;

    let message = if applied {
        format!("Timer {}: {} applied", id, verb)
    } else {
        format!("Timer {}: {} ignored in state {}", id, verb, snapshot.state)
    };
    Ok(Json(CommandResponse::from_outcome(applied, message, snapshot)))
}

/// Handle GET /timers - List all timers in creation order
pub async fn list_timers_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SlotSnapshot>>, ApiError> {
    state
        .inspect(|coordinator| coordinator.snapshot())
        .map(Json)
        .map_err(internal_error)
}

/// Handle POST /timers - Add a timer slot
pub async fn add_timer_handler(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<SlotSnapshot>), ApiError> {
    let snapshot = state
        .command("add timer", |coordinator| {
            let id = coordinator.add_slot()?;
            coordinator.slot_snapshot(id)
        })
        .map_err(internal_error)?
        .map_err(coordinator_error)?;

    info!("Timer {} added", snapshot.id);
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// Handle DELETE /timers/:id - Remove a timer slot
pub async fn remove_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    let id = SlotId(id);
    state
        .command(&format!("remove timer {}", id), |coordinator| coordinator.remove_slot(id))
        .map_err(internal_error)?
        .map_err(coordinator_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle POST /timers/:id/duration - Arm a timer with a duration in seconds
pub async fn set_duration_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = SlotId(id);
    run_command(&state, id, "set duration", |coordinator| {
        coordinator.request_set_duration(id, request.seconds)
    })
}

/// Handle POST /timers/:id/preset/:label - Arm a timer from a preset
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    Path((id, label)): Path<(u32, String)>,
) -> Result<Json<CommandResponse>, ApiError> {
    let Some(preset) = preset(&label) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("Unknown preset: {}", label))),
        ));
    };

    let id = SlotId(id);
    run_command(&state, id, &format!("preset {}", preset.label), |coordinator| {
        coordinator.request_set_duration(id, preset.seconds)
    })
}

/// Handle POST /timers/:id/start - Start, resume or restart a timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = SlotId(id);
    run_command(&state, id, "start", |coordinator| coordinator.request_start(id))
}

/// Handle POST /timers/:id/pause - Pause a running timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = SlotId(id);
    run_command(&state, id, "pause", |coordinator| coordinator.request_pause(id))
}

/// Handle POST /timers/:id/reset - Reset a timer to its full duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = SlotId(id);
    run_command(&state, id, "reset", |coordinator| {
        coordinator.request_reset(id).map(|()| true)
    })
}

/// Handle POST /timers/:id/toggle - The combined start/pause control
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<CommandResponse>, ApiError> {
    let id = SlotId(id);
    run_command(&state, id, "toggle", |coordinator| coordinator.request_toggle(id))
}

/// Handle GET /presets - List duration presets
pub async fn presets_handler() -> Json<Vec<Preset>> {
    Json(PRESETS.to_vec())
}

/// Handle GET /status - Return session status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, ApiError> {
    let (timers, max_timers, can_add_timer, live_subscriptions) = state
        .inspect(|coordinator| {
            (
                coordinator.snapshot(),
                coordinator.max_timers(),
                coordinator.can_add_slot(),
                coordinator.live_subscriptions(),
            )
        })
        .map_err(internal_error)?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timers,
        max_timers,
        can_add_timer,
        live_subscriptions,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
