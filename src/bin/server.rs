//! epochkv Server Binary
//!
//! Wires the store actor, snapshot scheduler, and a thin HTTP request
//! adapter together. The adapter only translates requests into bus
//! operations; all semantics live in the library.

use std::io::Read;
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Response, Server};
use tracing_subscriber::{fmt, EnvFilter};

use epochkv::{Config, EpochError, SnapshotScheduler, SnapshotStore, StoreActor, StoreHandle};

/// epochkv Server
#[derive(Parser, Debug)]
#[command(name = "epochkv-server")]
#[command(about = "In-memory multi-version key-value store with periodic snapshots")]
#[command(version)]
struct Args {
    /// Snapshot directory
    #[arg(short, long, default_value = "./epochkv_data")]
    snapshot_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Snapshot interval in seconds
    #[arg(short = 'i', long, default_value = "30")]
    snapshot_interval_secs: u64,
}

// =============================================================================
// Request/Response Bodies
// =============================================================================

#[derive(Debug, Deserialize)]
struct GetBody {
    key: String,
    version: i64,
}

#[derive(Debug, Deserialize)]
struct PutBody {
    key: String,
    value: String,
    version: i64,
}

#[derive(Debug, Serialize)]
struct ValueBody {
    value: String,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,epochkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("epochkv Server v{}", epochkv::VERSION);
    tracing::info!("Snapshot directory: {}", args.snapshot_dir);
    tracing::info!("Listen address: {}", args.listen);

    let config = Config::builder()
        .snapshot_dir(&args.snapshot_dir)
        .listen_addr(&args.listen)
        .snapshot_interval(Duration::from_secs(args.snapshot_interval_secs))
        .build();

    // Snapshot store
    let snapshots = match SnapshotStore::open(&config.snapshot_dir) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to open snapshot directory: {}", e);
            std::process::exit(1);
        }
    };

    // Restore must complete before the actor starts serving
    let mut actor = StoreActor::new(snapshots.clone());
    match snapshots.read_latest() {
        Ok(index) => actor.restore(index),
        Err(EpochError::NoSnapshotsFound) => {
            tracing::info!("No snapshots found, starting with an empty index");
        }
        Err(e) => {
            tracing::error!("Failed to restore from snapshot: {}", e);
            std::process::exit(1);
        }
    }

    let (handle, running_store) = match actor.start(config.get_timeout) {
        Ok(started) => started,
        Err(e) => {
            tracing::error!("Failed to start store actor: {}", e);
            std::process::exit(1);
        }
    };
    let running_scheduler =
        match SnapshotScheduler::new(handle.clone(), config.snapshot_interval).start() {
            Ok(started) => started,
            Err(e) => {
                tracing::error!("Failed to start snapshot scheduler: {}", e);
                std::process::exit(1);
            }
        };

    tracing::info!("Store actor and snapshot scheduler started");

    if let Err(e) = serve(&config.listen_addr, &handle) {
        tracing::error!("Server error: {}", e);
    }

    // Unreachable in practice (serve loops forever), kept for orderly
    // teardown if the listener ever fails.
    let _ = running_scheduler.stop();
    let _ = running_store.stop();
}

/// Accept loop: translate HTTP requests into bus operations
fn serve(addr: &str, store: &StoreHandle) -> Result<(), String> {
    let server = Server::http(addr).map_err(|e| format!("bind http at {}: {}", addr, e))?;
    tracing::info!("Listening on http://{}", addr);

    loop {
        let mut rq = match server.recv() {
            Ok(rq) => rq,
            Err(e) => {
                tracing::warn!("http recv error: {}", e);
                continue;
            }
        };

        let url = rq.url().to_string();
        let method = rq.method().as_str().to_string();

        if method == "GET" && url == "/healthz" {
            let _ = rq.respond(Response::from_string("OK\n").with_status_code(200));
            continue;
        }

        let mut body = String::new();
        if rq.as_reader().read_to_string(&mut body).is_err() {
            let _ = rq.respond(Response::from_string("bad request\n").with_status_code(400));
            continue;
        }

        match (method.as_str(), url.as_str()) {
            ("GET", "/kv") => {
                let parsed: GetBody = match serde_json::from_str(&body) {
                    Ok(p) => p,
                    Err(e) => {
                        let _ = rq.respond(
                            Response::from_string(format!("bad request: {}\n", e))
                                .with_status_code(400),
                        );
                        continue;
                    }
                };

                match store.get(parsed.key, parsed.version) {
                    Ok(Some(value)) => {
                        let _ = rq.respond(json_response(&ValueBody { value }, 200));
                    }
                    Ok(None) => {
                        let _ = rq.respond(Response::from_string("").with_status_code(404));
                    }
                    Err(e) => {
                        tracing::warn!("get failed: {}", e);
                        let _ = rq.respond(Response::from_string("").with_status_code(500));
                    }
                }
            }
            ("PUT", "/kv") => {
                let parsed: PutBody = match serde_json::from_str(&body) {
                    Ok(p) => p,
                    Err(e) => {
                        let _ = rq.respond(
                            Response::from_string(format!("bad request: {}\n", e))
                                .with_status_code(400),
                        );
                        continue;
                    }
                };

                match store.put(parsed.key, parsed.value, parsed.version) {
                    Ok(()) => {
                        let _ = rq.respond(Response::from_string("").with_status_code(200));
                    }
                    Err(e) => {
                        tracing::warn!("put failed: {}", e);
                        let _ = rq.respond(Response::from_string("").with_status_code(500));
                    }
                }
            }
            _ => {
                let _ = rq.respond(Response::from_string("not found\n").with_status_code(404));
            }
        }
    }
}

fn json_response<T: Serialize>(body: &T, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    let json = serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string());
    let mut resp = Response::from_string(json).with_status_code(status);
    if let Ok(ct) = Header::from_bytes(b"Content-Type", b"application/json") {
        resp.add_header(ct);
    }
    resp
}
