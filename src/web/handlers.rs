use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::SharedContext;
use super::render::{PageView, render_page};
use crate::error::RequestError;

/// Form field carrying the selected row.
pub const DEMO_INDEX_FIELD: &str = "demo_index";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub items: usize,
    pub features: usize,
}

impl RequestError {
    /// Malformed or out-of-range input answers 400, not 200, while still
    /// rendering the Form page with an error banner.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MalformedBody(_)
            | RequestError::Parse(_)
            | RequestError::IndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            RequestError::MissingFeature { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Row to keep selected in the dropdown when showing this error.
    fn selected_row(&self) -> Option<usize> {
        match self {
            RequestError::MissingFeature { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// Empty or absent input means "no selection"; anything else must be an
/// integer.
pub fn parse_demo_index(raw: Option<&str>) -> Result<Option<i64>, RequestError> {
    let value = raw.map(str::trim).unwrap_or("");
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| RequestError::Parse(value.to_string()))
}

/// First `demo_index` value of a url-encoded body. Later duplicates are
/// ignored; an empty body has no value.
pub fn first_form_value(body: &[u8], name: &str) -> Result<Option<String>, RequestError> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
        .map_err(|e| RequestError::MalformedBody(e.to_string()))?;
    Ok(pairs.into_iter().find(|(k, _)| k == name).map(|(_, v)| v))
}

/// Pull `demo_index` out of a url-encoded or multipart body. A missing or
/// unrecognised Content-Type is read as url-encoded.
async fn read_demo_index(request: Request) -> Result<Option<String>, RequestError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| {
            ct.trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        });

    if !is_multipart {
        let body = Bytes::from_request(request, &())
            .await
            .map_err(|e| RequestError::MalformedBody(e.body_text()))?;
        return first_form_value(&body, DEMO_INDEX_FIELD);
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| RequestError::MalformedBody(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RequestError::MalformedBody(e.to_string()))?
    {
        if field.name() == Some(DEMO_INDEX_FIELD) {
            let value = field
                .text()
                .await
                .map_err(|e| RequestError::MalformedBody(e.to_string()))?;
            return Ok(Some(value));
        }
    }
    Ok(None)
}

/// `GET /`
pub async fn home(State(ctx): State<SharedContext>) -> Html<String> {
    Html(render_page(&ctx, &PageView::default()))
}

/// `POST /`
pub async fn predict(State(ctx): State<SharedContext>, request: Request) -> Response {
    let raw = read_demo_index(request).await;
    let outcome = raw
        .and_then(|raw| parse_demo_index(raw.as_deref()))
        .and_then(|index| {
            index
                .map(|i| ctx.evaluate(i).map(PageView::result))
                .transpose()
        });

    match outcome {
        Ok(None) => Html(render_page(&ctx, &PageView::default())).into_response(),
        Ok(Some(view)) => {
            if let Some(eval) = &view.evaluation {
                log::debug!(
                    "Row {}: predicted {:.2}, actual {:?}",
                    eval.index,
                    eval.prediction,
                    eval.actual
                );
            }
            Html(render_page(&ctx, &view)).into_response()
        }
        Err(err) => {
            log::warn!("Rejected demo_index: {err}");
            let view = PageView::error(err.selected_row(), err.to_string());
            (err.status_code(), Html(render_page(&ctx, &view))).into_response()
        }
    }
}

/// `GET /health`
pub async fn health(State(ctx): State<SharedContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        items: ctx.row_count(),
        features: ctx.feature_count(),
    })
}
