// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Print service CLI
//!
//! Renders Liquid templates to HTML or PDF through the Incapption print
//! service, and hands finished files to a browser as a one-shot download.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use clap::{Args, Parser, Subcommand};
use pdf_service_client::{
    ClientConfig, DEFAULT_BASE_URL, PdfService, PdfServiceError, RenderRequest, serve_file,
};
use print_auth::PayloadSigner;
use serde_json::Value;
use tokio::sync::{Mutex, oneshot};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pdfsvc")]
#[command(about = "Render Liquid templates with the Incapption print service", long_about = None)]
#[command(version)]
struct Cli {
    /// Shared HMAC secret for signing requests
    #[arg(long, env = "PDF_SERVICE_HMAC_SECRET", hide_env_values = true, global = true)]
    secret: Option<String>,

    /// Base URL of the print service
    #[arg(long, env = "PDF_SERVICE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5, global = true)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RenderArgs {
    /// JSON file with the template variables (default: empty object)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Liquid template file
    #[arg(long)]
    template: PathBuf,

    /// Output path; must not exist yet
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a template to an HTML file
    Html(RenderArgs),

    /// Render a template to a PDF file
    Pdf(RenderArgs),

    /// Serve a file as a download to the first client that asks, then exit
    Serve {
        /// File to serve
        file: PathBuf,

        /// Delete the file once it has been handed over
        #[arg(long)]
        unlink: bool,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },

    /// Print the X-Hmac-Sha256 value for a render request
    Sign {
        /// JSON file with the template variables (default: empty object)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Liquid template file
        #[arg(long)]
        template: PathBuf,

        /// Filename field of the request
        #[arg(long)]
        filename: String,
    },
}

impl Cli {
    fn secret(&self) -> Result<String> {
        self.secret
            .clone()
            .context("missing HMAC secret: pass --secret or set PDF_SERVICE_HMAC_SECRET")
    }

    fn service(&self) -> Result<PdfService> {
        let config = ClientConfig::new(self.secret()?)
            .with_base_url(&self.base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs));
        PdfService::new(config).context("Failed to create print service client")
    }
}

async fn load_data(path: Option<&Path>) -> Result<Value> {
    let Some(path) = path else {
        return Ok(Value::Object(Default::default()));
    };
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read data file {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("Data file {} is not valid JSON", path.display()))
}

async fn load_template(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read template {}", path.display()))
}

struct ServeState {
    path: PathBuf,
    unlink: bool,
    served: AtomicBool,
    done: Mutex<Option<oneshot::Sender<()>>>,
}

fn error_response(path: &Path, err: PdfServiceError) -> Response {
    match err {
        PdfServiceError::NotFound { .. } => {
            error!(path = %path.display(), "File to serve does not exist");
            (StatusCode::NOT_FOUND, "file not found").into_response()
        }
        e => {
            error!(error = %e, "Failed to serve file");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to read file").into_response()
        }
    }
}

async fn get_download(method: Method, State(state): State<Arc<ServeState>>) -> Response {
    // axum routes HEAD here too. A HEAD only describes the download; it
    // neither unlinks the file nor ends the server.
    if method == Method::HEAD {
        return match serve_file(&state.path, false).await {
            Ok(download) => download.into_response().map(Body::from),
            Err(e) => error_response(&state.path, e),
        };
    }

    let result = serve_file(&state.path, state.unlink).await;
    if let Some(tx) = state.done.lock().await.take() {
        let _ = tx.send(());
    }

    match result {
        Ok(download) => {
            info!(file = %download.filename(), bytes = download.content_length(), "Served download");
            state.served.store(true, Ordering::SeqCst);
            download.into_response().map(Body::from)
        }
        Err(e) => error_response(&state.path, e),
    }
}

async fn serve_once(file: PathBuf, unlink: bool, bind: SocketAddr) -> Result<()> {
    let (tx, rx) = oneshot::channel();
    let state = Arc::new(ServeState {
        path: file.clone(),
        unlink,
        served: AtomicBool::new(false),
        done: Mutex::new(Some(tx)),
    });

    let app = Router::new()
        .route("/", get(get_download))
        .with_state(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!(
        address = %listener.local_addr()?,
        file = %file.display(),
        "Waiting for download request"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = rx.await;
        })
        .await
        .context("Download server failed")?;

    if !state.served.load(Ordering::SeqCst) {
        anyhow::bail!("Failed to serve {}", file.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "pdf_service_client=info,pdfsvc=info".to_string()),
        ))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Html(args) => {
            let service = cli.service()?;
            let data = load_data(args.data.as_deref()).await?;
            let template = load_template(&args.template).await?;
            let path = service
                .generate_html(&data, &template, &args.output)
                .await
                .with_context(|| format!("Failed to render HTML to {}", args.output.display()))?;
            println!("{}", path.display());
        }

        Commands::Pdf(args) => {
            let service = cli.service()?;
            let data = load_data(args.data.as_deref()).await?;
            let template = load_template(&args.template).await?;
            let path = service
                .generate_pdf(&data, &template, &args.output)
                .await
                .with_context(|| format!("Failed to render PDF to {}", args.output.display()))?;
            println!("{}", path.display());
        }

        Commands::Serve { file, unlink, bind } => {
            serve_once(file.clone(), *unlink, *bind).await?;
        }

        Commands::Sign {
            data,
            template,
            filename,
        } => {
            let signer = PayloadSigner::new(cli.secret()?.into());
            let data = load_data(data.as_deref()).await?;
            let template = load_template(template).await?;
            let request = RenderRequest::new(filename.as_str(), &data, &template);
            let (_, signature) = signer
                .sign_json(&request)
                .context("Failed to sign request")?;
            println!("{}", signature);
        }
    }

    Ok(())
}
