use axum::response::Json;
use once_cell::sync::Lazy;
use serde_json::json;
use std::time::Instant;

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Pins the uptime clock to process start rather than the first request.
pub fn mark_start() {
    Lazy::force(&START_TIME);
}

pub async fn root() -> Json<serde_json::Value> {
    let uptime_secs = START_TIME.elapsed().as_secs();
    Json(json!({
        "status": "ok",
        "uptime_secs": uptime_secs,
        "message": format!("Polling app up for {}", format_uptime(uptime_secs)),
    }))
}

const UNITS: [(u64, char); 4] = [(86_400, 'd'), (3_600, 'h'), (60, 'm'), (1, 's')];

/// Largest non-zero unit first; every smaller unit is shown once one has been.
fn format_uptime(seconds: u64) -> String {
    let mut remaining = seconds;
    let mut parts: Vec<String> = Vec::new();

    for (size, suffix) in UNITS {
        let amount = remaining / size;
        remaining %= size;
        if amount > 0 || !parts.is_empty() || size == 1 {
            parts.push(format!("{amount}{suffix}"));
        }
    }

    parts.join(" ")
}
