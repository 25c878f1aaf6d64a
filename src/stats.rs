use crate::config::TariffConfig;
use crate::models::{ChartPoint, ConsumptionRecord, ConsumptionSummary, HistoryRow};
use std::cmp::Reverse;

pub fn summarize(records: &[ConsumptionRecord], tariff: &TariffConfig) -> ConsumptionSummary {
    let total_kwh: f64 = records.iter().map(|record| record.kwh_consumidos).sum();
    let active_seconds = records
        .iter()
        .fold(0i64, |acc, record| acc.saturating_add(record.segundos_uso));

    ConsumptionSummary {
        total_kwh,
        estimated_cost: total_kwh * tariff.rate(),
        sessions: records.len(),
        active_seconds,
    }
}

pub fn format_active_time(seconds: i64) -> String {
    let hours = seconds.div_euclid(3600);
    let minutes = seconds.rem_euclid(3600) / 60;
    format!("{hours}h {minutes}m")
}

pub fn format_kwh(kwh: f64) -> String {
    format!("{kwh:.4} kWh")
}

pub fn format_cost(cost: f64) -> String {
    format!("${cost:.2} MXN")
}

/// Average load as shown in the history table; a missing sample reads as 0%.
pub fn format_load(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value}%"),
        None => "0%".to_string(),
    }
}

pub fn history_rows(records: &[ConsumptionRecord]) -> Vec<HistoryRow> {
    let mut rows: Vec<HistoryRow> = records
        .iter()
        .map(|record| HistoryRow {
            id: record.id,
            fecha: record.fecha.clone(),
            hora_inicio: record.hora_inicio.clone(),
            hora_fin: record.hora_fin.clone(),
            kwh_consumidos: record.kwh_consumidos,
            cpu: format_load(record.carga_cpu_promedio),
            gpu: format_load(record.carga_gpu_promedio),
        })
        .collect();
    rows.sort_by_key(|row| Reverse(row.id));
    rows
}

pub fn chart_points(records: &[ConsumptionRecord]) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            id: record.id,
            kwh: record.kwh_consumidos,
        })
        .collect()
}
