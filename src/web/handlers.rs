//! Page, API and asset handlers

use super::error::WebError;
use super::pages;
use super::state::AppState;
use crate::licensing::render::{Block, Report};
use crate::licensing::{self, DocumentKind, License};
use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};

/// Form fields, as sent by the page's GET form
#[derive(Debug, Default, Deserialize)]
pub struct LookupParams {
    /// Selector label ("DNI/NIE", "PASSAPORT", "CATSALUT")
    pub tipus: Option<String>,
    pub document: Option<String>,
}

impl LookupParams {
    fn kind_label(&self) -> String {
        self.tipus
            .clone()
            .unwrap_or_else(|| DocumentKind::DniNie.label().to_string())
    }

    fn document(&self) -> String {
        self.document.clone().unwrap_or_default()
    }
}

/// Run the blocking lookup off the async runtime
async fn run_lookup(
    state: &AppState,
    kind_label: String,
    document: String,
) -> Result<Option<Vec<License>>, WebError> {
    let client = state.client.clone();
    tokio::task::spawn_blocking(move || licensing::consult(&client, &kind_label, &document))
        .await
        .map_err(|e| WebError::Internal(format!("Lookup task failed: {}", e)))
}

/// GET / - the lookup form, with results when a document was entered
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Html<String>, WebError> {
    let kind_label = params.kind_label();
    let document = params.document();

    let report = run_lookup(&state, kind_label.clone(), document.clone())
        .await?
        .map(|licenses| Report::new(&licenses));

    Ok(Html(pages::index_page(
        &kind_label,
        &document,
        report.as_ref(),
    )))
}

/// Response for GET /api/licenses
#[derive(Debug, Serialize)]
pub struct LookupResponse {
    pub tipus: String,
    /// False when the document was blank (no lookup made)
    pub queried: bool,
    /// Every returned license
    pub found: usize,
    pub licenses: Vec<License>,
    /// Display classification, one per license
    pub blocks: Vec<Block>,
}

/// GET /api/licenses - mapped licenses and their classification as JSON
///
/// Query params:
///   - tipus: selector label (default: DNI/NIE)
///   - document: document value
pub async fn api_licenses(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<LookupResponse>, WebError> {
    let kind_label = params.kind_label();
    let document = params.document();

    let response = match run_lookup(&state, kind_label.clone(), document).await? {
        Some(licenses) => {
            let report = Report::new(&licenses);
            LookupResponse {
                tipus: kind_label,
                queried: true,
                found: report.found,
                licenses,
                blocks: report.blocks,
            }
        }
        None => LookupResponse {
            tipus: kind_label,
            queried: false,
            found: 0,
            licenses: Vec::new(),
            blocks: Vec::new(),
        },
    };

    Ok(Json(response))
}

/// GET /logo.png - static logo asset
pub async fn logo(State(state): State<AppState>) -> Result<impl IntoResponse, WebError> {
    let path = state.logo_path.as_path();
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(WebError::NotFound(format!(
            "Logo not found: {}",
            path.display()
        ))),
        Err(e) => Err(WebError::Internal(format!(
            "Failed to read logo {}: {}",
            path.display(),
            e
        ))),
    }
}
