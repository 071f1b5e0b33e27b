use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    routing::post,
    Router,
    Json,
    http::Method,
};
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{AnalyzeForm, AnalyzeRequest, UploadedFile},
    services::excel::{summarize, AnalysisResult},
};
use tower_http::cors::{CorsLayer, Any};

// Room for multipart boundaries, headers and the column fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(max_file_size: usize) -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/analyze", post(analyze_file))
        .layer(DefaultBodyLimit::max(max_file_size.saturating_add(MULTIPART_OVERHEAD)))
        .layer(cors)
}

#[axum::debug_handler]
async fn analyze_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let start = std::time::Instant::now();

    let form = read_form(&mut multipart, state.config.max_file_size).await?;
    let AnalyzeRequest { file_name, file_data, columns } = form
        .validate(state.config.max_file_size)
        .map_err(AppError::Validation)?;

    tracing::info!(
        "Analyzing file: {}, size: {}KB, columns: {:?}",
        file_name,
        file_data.len() / 1024,
        columns
    );

    let result = tokio::task::spawn_blocking(move || {
        summarize(&file_data, &file_name, &columns)
    })
    .await??;

    tracing::info!(
        "Summarized {} columns of {} in {:?}",
        result.summary.len(),
        result.file,
        start.elapsed()
    );

    Ok(Json(result))
}

async fn read_form(multipart: &mut Multipart, max_file_size: usize) -> Result<AnalyzeForm, AppError> {
    let upload_error = |err: MultipartError| AppError::from_multipart(err, max_file_size);
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput("Only one file may be uploaded".to_string()));
                }
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await.map_err(upload_error)?;
                form.file = Some(UploadedFile { name: file_name, data });
            }
            Some("columns") => form.columns.push(field.text().await.map_err(upload_error)?),
            other => tracing::debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(form)
}
