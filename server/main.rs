/// leafcheck server
///
/// Screens uploaded photos with a local classifier, captions them from simple
/// visual statistics, and forwards likely plants to the plant.id API.
/// Served by a synchronous tiny_http server, one thread per request.
///
/// Run with:
///   MODEL_PATH=models/plant_classifier.json cargo run --bin leafcheck-server --release
///
/// Routes:
///   GET  /            upload page
///   POST /identify    local analysis + external identification
///   POST /test-local  local analysis only
///   GET  /model-info  model metadata

mod render;
mod routes;
mod handlers;
mod util;

use std::process::ExitCode;
use std::sync::Arc;

use leafcheck::{AppContext, Config};
use tiny_http::Server;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    // LOG_FORMAT - "json" or "text" (default: "text")
    // RUST_LOG   - standard env filter (default: "leafcheck=info,leafcheck_server=info")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leafcheck=info,leafcheck_server=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let ctx = match AppContext::from_config(&config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            error!(error = %e, model = %config.model_path.display(), "startup failed");
            return ExitCode::FAILURE;
        }
    };

    let addr = config.bind_addr();
    let server = match Server::http(&addr) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, addr = %addr, "failed to bind HTTP server");
            return ExitCode::FAILURE;
        }
    };

    info!(
        addr = %addr,
        upload_dir = %config.upload_dir.display(),
        max_dimension = config.max_dimension,
        "leafcheck listening"
    );

    // Each request runs on its own thread; the context is read-only, so the
    // slow external call never blocks other requests.
    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        std::thread::spawn(move || {
            routes::dispatch(request, &ctx);
        });
    }
    ExitCode::SUCCESS
}
