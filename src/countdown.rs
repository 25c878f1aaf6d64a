use crate::models::ConsumptionRecord;
use chrono::NaiveDateTime;
use tracing::warn;

/// Nominal collector cadence.
pub const BLOCK_SECONDS: i64 = 900;
/// Slack added so the reload lands after the collector has written.
pub const GRACE_SECONDS: i64 = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
#[error("invalid block end timestamp '{value}': {source}")]
pub struct CountdownError {
    value: String,
    #[source]
    source: chrono::ParseError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    NoData,
    Active { seconds: i64 },
    Expired,
    Unavailable,
}

impl Countdown {
    pub fn seconds(&self) -> Option<i64> {
        match self {
            Countdown::Active { seconds } => Some(*seconds),
            _ => None,
        }
    }
}

// The last row of the scan is taken as the newest block; order is not checked.
pub fn evaluate(records: &[ConsumptionRecord], now: NaiveDateTime) -> Countdown {
    let Some(last) = records.last() else {
        return Countdown::NoData;
    };

    match block_end(last) {
        Ok(end) => {
            let seconds = seconds_remaining(end, now);
            if seconds > 0 {
                Countdown::Active { seconds }
            } else {
                Countdown::Expired
            }
        }
        Err(err) => {
            warn!(id = last.id, "cannot sync countdown: {err}");
            Countdown::Unavailable
        }
    }
}

pub fn block_end(record: &ConsumptionRecord) -> Result<NaiveDateTime, CountdownError> {
    let value = format!("{} {}", record.fecha, record.hora_fin);
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
        .map_err(|source| CountdownError { value, source })
}

/// `900 - elapsed + 5`, with elapsed truncated to whole seconds.
pub fn seconds_remaining(last_end: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let elapsed = (now - last_end).num_seconds();
    BLOCK_SECONDS - elapsed + GRACE_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(id: i64, fecha: &str, hora_fin: &str) -> ConsumptionRecord {
        ConsumptionRecord {
            id,
            fecha: fecha.to_string(),
            hora_inicio: "00:00:00".to_string(),
            hora_fin: hora_fin.to_string(),
            kwh_consumidos: 0.1,
            segundos_uso: 900,
            carga_cpu_promedio: None,
            carga_gpu_promedio: None,
        }
    }

    fn end_of(record: &ConsumptionRecord) -> NaiveDateTime {
        block_end(record).unwrap()
    }

    #[test]
    fn remaining_is_positive_and_decreasing_inside_window() {
        let last = record(1, "2026-10-19", "10:15:00");
        let end = end_of(&last);

        let mut previous = i64::MAX;
        for elapsed in [0, 1, 60, 450, 899, 900, 904] {
            let now = end + Duration::seconds(elapsed);
            let remaining = seconds_remaining(end, now);
            assert_eq!(remaining, 900 - elapsed + 5);
            assert!(remaining > 0);
            assert!(remaining < previous);
            previous = remaining;

            assert_eq!(
                evaluate(std::slice::from_ref(&last), now),
                Countdown::Active { seconds: remaining }
            );
        }
    }

    #[test]
    fn countdown_hidden_once_window_has_passed() {
        let last = record(1, "2026-10-19", "10:15:00");
        let end = end_of(&last);

        for elapsed in [905, 906, 3600] {
            let now = end + Duration::seconds(elapsed);
            let countdown = evaluate(std::slice::from_ref(&last), now);
            assert_eq!(countdown, Countdown::Expired);
            assert_eq!(countdown.seconds(), None);
        }
    }

    #[test]
    fn sub_second_elapsed_still_counts_down() {
        let last = record(1, "2026-10-19", "10:15:00");
        let now = end_of(&last) + Duration::milliseconds(904_900);
        assert_eq!(
            evaluate(std::slice::from_ref(&last), now),
            Countdown::Active { seconds: 1 }
        );
    }

    #[test]
    fn uses_last_row_of_scan() {
        let rows = vec![
            record(1, "2026-10-19", "09:00:00"),
            record(2, "2026-10-19", "10:15:00"),
        ];
        let now = end_of(&rows[1]) + Duration::seconds(100);
        assert_eq!(evaluate(&rows, now), Countdown::Active { seconds: 805 });
    }

    #[test]
    fn malformed_timestamp_is_unavailable() {
        let last = record(7, "19/10/2026", "10:15");
        let now = NaiveDateTime::parse_from_str("2026-10-19 10:20:00", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(evaluate(&[last], now), Countdown::Unavailable);
    }

    #[test]
    fn no_rows_means_no_countdown() {
        let now = NaiveDateTime::parse_from_str("2026-10-19 10:20:00", TIMESTAMP_FORMAT).unwrap();
        assert_eq!(evaluate(&[], now), Countdown::NoData);
    }
}
