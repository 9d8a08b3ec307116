//! Actix Web HTTP server.
//!
//! Endpoints:
//! - `GET /api/health`
//! - `GET /api/libraries`
//! - `POST /api/gemini`
//! - `POST /api/install-library`
//! - `GET /libs/{bundle}`
//! - `GET /`, `GET /landing`, `GET /app`

use crate::{
    assets::{self, Page},
    completion::{self, CompletionRequest},
    config::ServerConfig,
    error::{json_error_handler, ApiError},
    gemini::{GeminiClient, UpstreamError},
    libraries::{Library, LibraryAvailability, LibraryChecker, UnknownLibrary},
    probe::{self, HealthResponse},
};
use actix_cors::Cors;
use actix_web::{
    dev::Service, http::header, web, App, HttpRequest, HttpResponse, HttpServer,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub struct AppState {
    pub config: ServerConfig,
    pub gemini: GeminiClient,
    pub libraries: LibraryChecker,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, UpstreamError> {
        let gemini = GeminiClient::new(&config)?;
        let libraries = LibraryChecker::new(config.asset_root.clone());
        Ok(Self {
            config,
            gemini,
            libraries,
        })
    }
}

/// Routes, extractor config and the JSON 404 fallback. Middleware is added
/// by [`serve`].
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(
                web::JsonConfig::default()
                    .limit(JSON_BODY_LIMIT)
                    .error_handler(json_error_handler),
            )
            .route("/", web::get().to(landing_page))
            .route("/landing", web::get().to(landing_page))
            .route("/app", web::get().to(app_page))
            .route("/libs/{bundle}", web::get().to(library_bundle))
            .route("/api/health", web::get().to(health_check))
            .route("/api/libraries", web::get().to(list_libraries))
            .route("/api/gemini", web::post().to(handle_gemini))
            .route("/api/install-library", web::post().to(install_library))
            .default_service(web::to(not_found));
    }
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
}

pub async fn serve(config: ServerConfig) -> Result<()> {
    let addr = config.bind_addr();
    let shutdown_timeout = config.shutdown_timeout_secs;

    let state =
        web::Data::new(AppState::new(config).context("failed to build Gemini HTTP client")?);
    log_startup(&state, &addr);

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap_fn(|req, srv| {
                info!(method = %req.method(), path = %req.path(), "request");
                srv.call(req)
            })
            .configure(configure(state.clone()))
    })
    .shutdown_timeout(shutdown_timeout)
    .bind(&addr)
    .with_context(|| format!("failed to bind {}", addr))?
    .run()
    .await
    .context("server error")?;

    info!("nyaya-proxy stopped");
    Ok(())
}

fn log_startup(state: &AppState, addr: &str) {
    info!(
        addr = %addr,
        model = %state.config.model,
        api_key = %state.config.masked_api_key(),
        upstream = %state.gemini.url(),
        timeout_secs = state.config.request_timeout_secs,
        "Indian Law AI server listening"
    );

    for library in state.libraries.list_missing() {
        warn!(
            library = %library,
            hint = %library.install_command(),
            "optional client library not installed"
        );
    }
}

async fn landing_page(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    html_page(&state, Page::Landing).await
}

async fn app_page(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    html_page(&state, Page::App).await
}

async fn html_page(state: &AppState, page: Page) -> Result<HttpResponse, ApiError> {
    let bytes = assets::read_page(&state.config.asset_root, page).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(bytes))
}

async fn library_bundle(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let bytes = assets::read_bundle(&state.libraries, &path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(bytes))
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let report = probe::probe(&state.gemini, &state.libraries).await;
    HttpResponse::Ok().json(HealthResponse::from(report))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LibrariesResponse {
    status: &'static str,
    libraries: LibraryAvailability,
    missing_libraries: Vec<Library>,
}

async fn list_libraries(state: web::Data<AppState>) -> HttpResponse {
    let libraries = state.libraries.check_libraries();
    let missing_libraries = libraries.missing();
    HttpResponse::Ok().json(LibrariesResponse {
        status: "ok",
        libraries,
        missing_libraries,
    })
}

async fn handle_gemini(
    state: web::Data<AppState>,
    body: web::Json<CompletionRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = body.into_inner().validate()?;

    let response = completion::complete(&state.gemini, &request)
        .await
        .map_err(|e| {
            error!(error = %e, "error calling Gemini API");
            e
        })?;

    Ok(HttpResponse::Ok().json(response))
}

#[derive(Debug, Deserialize)]
struct InstallRequest {
    #[serde(default)]
    library: Option<String>,
}

#[derive(Debug, Serialize)]
struct InstallResponse {
    status: &'static str,
    message: String,
    instructions: String,
}

/// Advisory only: the server never runs a package manager.
async fn install_library(body: web::Json<InstallRequest>) -> Result<HttpResponse, ApiError> {
    let name = match body.into_inner().library {
        Some(name) if !name.is_empty() => name,
        _ => {
            return Err(ApiError::bad_request(
                "Missing library name",
                "Please provide a library name to install",
            ))
        }
    };

    let library: Library = name
        .parse()
        .map_err(|e: UnknownLibrary| ApiError::bad_request("Invalid library", e.to_string()))?;

    info!(library = %library, "install requested");
    Ok(HttpResponse::Ok().json(InstallResponse {
        status: "info",
        message: format!(
            "For security reasons, please install {} manually by running: {}",
            library,
            library.install_command()
        ),
        instructions: format!(
            "Run the following command in your terminal:\n{}",
            library.install_command()
        ),
    }))
}

async fn not_found(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    Err(ApiError::route_not_found(req.path()))
}
