use crate::config::TariffConfig;
use crate::countdown::{self, Countdown};
use crate::errors::AppError;
use crate::models::{ConsumptionRecord, HistoryRow, InventoryItem, InventoryRequest, SummaryResponse};
use crate::state::AppState;
use crate::stats::{format_active_time, history_rows, summarize};
use crate::storage;
use crate::ui::{render_index, DashboardView};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Local;
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let tariff = TariffConfig::load(&state.config_path).await?;
    let records = storage::read_consumption(&state.db_path).await;
    let inventory = storage::read_inventory(&state.db_path).await;
    let countdown = current_countdown(&records);

    let view = DashboardView::new(&records, inventory, &tariff, countdown);
    Ok(Html(render_index(&view)))
}

pub async fn get_summary(State(state): State<AppState>) -> Result<Json<SummaryResponse>, AppError> {
    let tariff = TariffConfig::load(&state.config_path).await?;
    let records = storage::read_consumption(&state.db_path).await;
    let summary = summarize(&records, &tariff);

    Ok(Json(SummaryResponse {
        total_kwh: summary.total_kwh,
        estimated_cost: summary.estimated_cost,
        sessions: summary.sessions,
        active_seconds: summary.active_seconds,
        active_time: format_active_time(summary.active_seconds),
        countdown_seconds: current_countdown(&records).seconds(),
    }))
}

pub async fn get_consumption(State(state): State<AppState>) -> Json<Vec<HistoryRow>> {
    let records = storage::read_consumption(&state.db_path).await;
    Json(history_rows(&records))
}

pub async fn get_inventory(State(state): State<AppState>) -> Json<Vec<InventoryItem>> {
    Json(storage::read_inventory(&state.db_path).await)
}

pub async fn add_inventory(
    State(state): State<AppState>,
    Json(payload): Json<InventoryRequest>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    apply_inventory(&state, &payload).await?;
    Ok(Json(storage::read_inventory(&state.db_path).await))
}

pub async fn register_inventory(
    State(state): State<AppState>,
    Form(payload): Form<InventoryRequest>,
) -> Result<Redirect, AppError> {
    apply_inventory(&state, &payload).await?;
    Ok(Redirect::to("/"))
}

async fn apply_inventory(state: &AppState, payload: &InventoryRequest) -> Result<InventoryItem, AppError> {
    if payload.watts < 1 {
        return Err(AppError::bad_request("watts must be at least 1"));
    }

    let item = storage::insert_inventory(&state.db_path, &payload.aparato, payload.watts).await?;
    info!(id = item.id, aparato = %item.aparato, watts = item.watts, "inventory item registered");
    Ok(item)
}

fn current_countdown(records: &[ConsumptionRecord]) -> Countdown {
    countdown::evaluate(records, Local::now().naive_local())
}
