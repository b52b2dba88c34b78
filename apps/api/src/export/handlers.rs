use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::entries::parse_type_filter;
use crate::errors::AppError;
use crate::export::{export_filename, render_markdown, ExportFormat};
use crate::state::AppState;
use crate::store::{EntryOrder, EntryQuery};

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub category: Option<String>,
}

/// GET /api/v1/export?format=&type=&category=
pub async fn handle_export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let format = ExportFormat::parse(params.format.as_deref());
    let query = EntryQuery {
        entry_type: parse_type_filter(params.entry_type.as_deref())?,
        category: params.category.filter(|c| !c.trim().is_empty()),
        order: EntryOrder::DateDesc,
        ..Default::default()
    };

    let entries = state.store.find_many(&query).await?;
    let exported_at = Utc::now();

    let body = match format {
        ExportFormat::Json => serde_json::to_string_pretty(&entries)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize export: {e}")))?,
        ExportFormat::Markdown => render_markdown(&entries, exported_at),
    };

    info!("Exported {} entries as {:?}", entries.len(), format);

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_filename(format, exported_at)
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
