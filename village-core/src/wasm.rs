//! WASM bindings for the village-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every export returns a JSON string; failures come back as an `error`
//! object instead of a thrown exception.

use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::output::{self, DistributionOutput, PlacementOutput};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[village-core {}] {}", record.level(), record.args());
        if record.level() <= Level::Warn {
            console_error(&line);
        } else {
            console_log(&line);
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger. Unknown levels fall back to `warn`.
/// Returns false if a logger was already installed; the level is still applied.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    let filter = level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::Warn);
    let installed = log::set_logger(&LOGGER).is_ok();
    log::set_max_level(filter);
    installed
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        console_error(&format!("Error serializing output: {e}"));
        "{\"error\": {\"kind\": \"internal\", \"message\": \"serialization failed\"}}".to_string()
    })
}

fn report(context: &str, error: Option<&output::ErrorInfo>) {
    if let Some(e) = error {
        console_error(&format!("Error in {context}: {}", e.message));
    }
}

/// Lay out every member. `config_json` may be empty for defaults.
#[wasm_bindgen]
pub fn distribute_members(members_json: &str, config_json: &str) -> String {
    let out: DistributionOutput = output::distribute_json(members_json, config_json);
    report("distribute_members", out.error.as_ref());
    to_json(&out)
}

/// Best position on `circle` given already placed positions.
#[wasm_bindgen]
pub fn find_optimal_position(circle: i32, positions_json: &str, config_json: &str) -> String {
    let out: PlacementOutput = output::optimal_json(i64::from(circle), positions_json, config_json);
    report("find_optimal_position", out.error.as_ref());
    to_json(&out)
}

/// Starting position for a member about to be added to `circle`.
#[wasm_bindgen]
pub fn seed_member_position(circle: i32, members_json: &str, config_json: &str) -> String {
    let out: PlacementOutput = output::seed_json(i64::from(circle), members_json, config_json);
    report("seed_member_position", out.error.as_ref());
    to_json(&out)
}
