use serde::{Deserialize, Serialize};

/// One 15-minute block written by the collector into `consumo_pc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub id: i64,
    pub fecha: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub kwh_consumidos: f64,
    pub segundos_uso: i64,
    pub carga_cpu_promedio: Option<f64>,
    pub carga_gpu_promedio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub aparato: String,
    pub watts: i64,
}

#[derive(Debug, Deserialize)]
pub struct InventoryRequest {
    #[serde(default)]
    pub aparato: String,
    #[serde(default = "default_watts")]
    pub watts: i64,
}

pub const DEFAULT_WATTS: i64 = 100;

fn default_watts() -> i64 {
    DEFAULT_WATTS
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionSummary {
    pub total_kwh: f64,
    pub estimated_cost: f64,
    pub sessions: usize,
    pub active_seconds: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub total_kwh: f64,
    pub estimated_cost: f64,
    pub sessions: usize,
    pub active_seconds: i64,
    pub active_time: String,
    pub countdown_seconds: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub id: i64,
    pub fecha: String,
    pub hora_inicio: String,
    pub hora_fin: String,
    pub kwh_consumidos: f64,
    pub cpu: String,
    pub gpu: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub id: i64,
    pub kwh: f64,
}
