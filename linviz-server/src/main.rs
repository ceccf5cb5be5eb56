//! linviz server
//!
//! Exposes one visualizer session over stdin/stdout. Each input line is a
//! JSON request `{"id": .., "method": .., "params": {..}}`; each response is
//! one line `{"id": .., "result": ..}` or `{"id": .., "error": {..}}`.
//! Requests without an id are notifications and get no response.
//!
//! Logs go to stderr, filtered by `RUST_LOG` (default `info`). The session
//! config is read from the file named by `LINVIZ_CONFIG`, if set.

mod protocol;

use linviz::{Session, VizConfig, VizError};
use protocol::{Request, Response};
use serde_json::Value as JsonValue;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const SERVER_NAME: &str = "linviz";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn write_line(out: &mut impl Write, response: &Response) -> io::Result<()> {
    let text = serde_json::to_string(response).map_err(io::Error::other)?;
    writeln!(out, "{}", text)?;
    out.flush()
}

/// Handle one input line. `None` means nothing should be written back.
fn process_line(session: &mut Session, line: &str) -> Option<Response> {
    let request: Request = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            let err = VizError::protocol(format!("parse error: {}", e));
            return Some(Response::from_result(JsonValue::Null, Err(err)));
        }
    };

    debug!(method = %request.method, "processing");
    let result = protocol::handle(session, &request.method, request.params);
    if let Err(e) = &result {
        if e.is_warning() {
            warn!(method = %request.method, error = %e, "request degraded");
        } else {
            debug!(method = %request.method, error = %e, "request rejected");
        }
    }

    // Notifications (no id) get no response
    let id = request.id?;
    Some(Response::from_result(id, result))
}

fn main() -> ExitCode {
    init_logging();

    let config = match VizConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let mut session = Session::new(config);
    info!(name = SERVER_NAME, version = SERVER_VERSION, "server ready");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Some(response) = process_line(&mut session, line) {
                    if let Err(e) = write_line(&mut stdout.lock(), &response) {
                        error!(error = %e, "failed to write response");
                        return ExitCode::FAILURE;
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
