//! Static file server for the rendered site.
//!
//! Serves files under a document root with a fixed MIME table, lists
//! directories, and accepts CSP violation reports on `POST /csp-report`.

use crate::config::ServerConfig;
use crate::dates::{http_date, rfc3339};
use crate::error::{ReleaseNotesError, Result};
use crate::render::escape_html;
use axum::body::{Body, Bytes};
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

pub const CSP_REPORT_PATH: &str = "/csp-report";

const DEFAULT_MIME: &str = "application/octet-stream";

/// Handler state, immutable once the server starts
#[derive(Debug, Clone)]
pub struct ServerState {
    root: PathBuf,
    content_security_policy: HeaderValue,
}

impl ServerState {
    pub fn new(root: impl Into<PathBuf>, content_security_policy: &str) -> Result<Self> {
        let content_security_policy = HeaderValue::from_str(content_security_policy)
            .map_err(|e| ReleaseNotesError::server(format!("Invalid Content-Security-Policy: {}", e)))?;
        Ok(ServerState {
            root: root.into(),
            content_security_policy,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// MIME type for a file extension, `application/octet-stream` when unknown
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => DEFAULT_MIME,
    }
}

/// Map a request path onto the document root
///
/// `/` becomes `/index.html`. Returns `None` for paths that would leave the
/// root.
pub fn resolve_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let request_path = if request_path == "/" {
        "/index.html"
    } else {
        request_path
    };

    let mut resolved = root.to_path_buf();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// Fields of a CSP violation worth logging
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CspViolation {
    pub document_uri: Option<String>,
    pub blocked_uri: Option<String>,
    pub violated_directive: Option<String>,
    pub original_policy: Option<String>,
    pub source_file: Option<String>,
    pub line_number: Option<u64>,
}

fn is_extension_source(source_file: &str, blocked_uri: &str) -> bool {
    source_file.contains("moz-extension")
        || source_file.contains("chrome-extension")
        || source_file.contains("extension:")
        || blocked_uri.contains("extension:")
}

/// Parse a CSP report body
///
/// Returns `None` for malformed bodies, reports caused by browser
/// extensions, and reports carrying neither a document URI nor a violated
/// directive.
pub fn parse_csp_report(body: &[u8]) -> Option<CspViolation> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let report = value
        .get("csp-report")
        .filter(|inner| !inner.is_null())
        .unwrap_or(&value);

    let field = |name: &str| report.get(name).and_then(Value::as_str).map(str::to_string);

    let violation = CspViolation {
        document_uri: field("document-uri"),
        blocked_uri: field("blocked-uri"),
        violated_directive: field("violated-directive"),
        original_policy: field("original-policy"),
        source_file: field("source-file"),
        line_number: report.get("line-number").and_then(Value::as_u64),
    };

    if is_extension_source(
        violation.source_file.as_deref().unwrap_or(""),
        violation.blocked_uri.as_deref().unwrap_or(""),
    ) {
        return None;
    }

    if violation.document_uri.is_none() && violation.violated_directive.is_none() {
        return None;
    }

    Some(violation)
}

async fn csp_report_handler(body: Bytes) -> StatusCode {
    match parse_csp_report(&body) {
        Some(v) => warn!(
            document_uri = v.document_uri.as_deref().unwrap_or(""),
            blocked_uri = v.blocked_uri.as_deref().unwrap_or(""),
            violated_directive = v.violated_directive.as_deref().unwrap_or(""),
            original_policy = v.original_policy.as_deref().unwrap_or(""),
            source_file = v.source_file.as_deref().unwrap_or(""),
            line_number = v.line_number,
            "CSP violation"
        ),
        None => debug!(bytes = body.len(), "ignored CSP report"),
    }
    StatusCode::NO_CONTENT
}

fn text_response(status: StatusCode, body: &'static str) -> Response {
    (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

fn error_response(err: &std::io::Error, path: &Path) -> Response {
    if err.kind() == ErrorKind::NotFound {
        text_response(StatusCode::NOT_FOUND, "404 Not Found")
    } else {
        error!(path = %path.display(), error = %err, "failed to serve path");
        text_response(StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error")
    }
}

fn modified_time(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH)
        .into()
}

async fn directory_listing(dir: &Path, request_path: &str) -> std::io::Result<String> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().to_string());
    }
    names.sort();

    let prefix = request_path.trim_end_matches('/');
    let title = escape_html(request_path);
    let mut html = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Index of {title}</title></head>\n<body>\n<h1>Index of {title}</h1>\n<ul>"
    );

    for name in names {
        let metadata = tokio::fs::metadata(dir.join(&name)).await?;
        let href = escape_html(&format!("{}/{}", prefix, name));
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> - {}</li>",
            href,
            escape_html(&name),
            rfc3339(modified_time(&metadata))
        ));
    }

    html.push_str("</ul></body></html>");
    Ok(html)
}

async fn serve_path(state: &ServerState, request_path: &str) -> Response {
    let Some(path) = resolve_path(&state.root, request_path) else {
        return text_response(StatusCode::NOT_FOUND, "404 Not Found");
    };

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) => return error_response(&e, &path),
    };

    if metadata.is_dir() {
        return match directory_listing(&path, request_path).await {
            Ok(html) => (StatusCode::OK, [(header::CONTENT_TYPE, "text/html")], html).into_response(),
            Err(e) => error_response(&e, &path),
        };
    }

    match tokio::fs::read(&path).await {
        Ok(content) => {
            let last_modified = http_date(modified_time(&metadata));
            let mut response = (StatusCode::OK, Body::from(content)).into_response();
            let headers = response.headers_mut();
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime_type(&path)));
            headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            if let Ok(value) = HeaderValue::from_str(&last_modified) {
                headers.insert(header::LAST_MODIFIED, value);
            }
            response
        }
        Err(e) => error_response(&e, &path),
    }
}

async fn static_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let request_path = uri.path();
    let mut response = serve_path(&state, request_path).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        state.content_security_policy.clone(),
    );
    debug!(path = request_path, status = response.status().as_u16(), "served");
    response
}

pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .route(
            CSP_REPORT_PATH,
            post(csp_report_handler)
                .fallback(static_handler)
                .layer(DefaultBodyLimit::disable()),
        )
        .fallback(static_handler)
        .with_state(Arc::new(state))
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Serve `config.root` on `config.bind` until SIGINT or SIGTERM
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let root = PathBuf::from(&config.root);
    let is_dir = tokio::fs::metadata(&root)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ReleaseNotesError::server(format!(
            "Document root {} is not a directory",
            root.display()
        )));
    }

    let state = ServerState::new(root, &config.content_security_policy)?;
    let listener = TcpListener::bind(&config.bind).await.map_err(|e| {
        ReleaseNotesError::server(format!("Cannot bind {}: {}", config.bind, e))
    })?;
    let addr = listener.local_addr()?;
    info!(addr = %addr, root = %config.root, "release notes server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}
