use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::error::Result;
use crate::invoice::InvoiceData;
use crate::pdf::{self, ChromiumEngine};

pub fn app() -> Router {
    Router::new().route("/api/generate-pdf", post(generate_pdf))
}

/// Run the export endpoint on localhost. One interactive user at a
/// time is the expected load; there is no concurrency limit and no
/// cancellation of an in-flight export.
pub async fn serve(port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    log::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app()).await?;
    Ok(())
}

/// `POST /api/generate-pdf`: JSON invoice in, PDF bytes out.
/// Any internal failure collapses to one generic error body; the
/// client may re-trigger the request, nothing is retried here.
async fn generate_pdf(Json(mut invoice): Json<InvoiceData>) -> Response {
    // Re-derive instead of trusting whatever the client sent.
    invoice.refresh_service_period();

    let result = tokio::task::spawn_blocking(move || {
        let engine = ChromiumEngine::new();
        pdf::export(&invoice, &engine)
    })
    .await;

    match result {
        Ok(Ok(document)) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", document.filename),
                ),
            ],
            document.bytes,
        )
            .into_response(),
        Ok(Err(e)) => {
            log::error!("PDF generation error: {e}");
            generation_failed()
        }
        Err(e) => {
            log::error!("PDF generation task failed: {e}");
            generation_failed()
        }
    }
}

fn generation_failed() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to generate PDF" })),
    )
        .into_response()
}
