// Scheduling engine CLI entry point.
//
// Reads a ScheduleRequest as JSON (from a file path argument, or stdin if
// none is given) and prints the resulting ScheduleResponse as JSON. The
// Tauri command surface in `commands::schedule` wraps the same
// `campus_timetable_engine::schedule` call for desktop-app callers.

use std::io::Read as _;

use tracing::{error, info};

use campus_timetable_engine::{logging, schedule, ScheduleRequest, NAME, VERSION};

fn main() {
    logging::init_default_logging();

    info!(name = NAME, version = VERSION, "starting scheduling run");

    let input = match read_input() {
        Ok(input) => input,
        Err(e) => {
            error!(error = %e, "failed to read request");
            std::process::exit(1);
        }
    };

    let request: ScheduleRequest = match serde_json::from_str(&input) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "request is not valid JSON for ScheduleRequest");
            std::process::exit(1);
        }
    };

    match schedule(request) {
        Ok(response) => {
            let output = serde_json::to_string_pretty(&response)
                .expect("ScheduleResponse always serializes");
            println!("{output}");
        }
        Err(e) => {
            error!(error = %e, "scheduling request failed validation");
            std::process::exit(1);
        }
    }
}

fn read_input() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
