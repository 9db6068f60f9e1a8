use std::sync::Arc;

use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use tracing::{debug, error};

use crate::errors::{Result, TinylinkError};
use crate::metrics_core::MetricsRecorder;
use crate::services::{ClickTracker, ShortenerService};
use crate::storage::UrlRecord;

pub struct RedirectService;

impl RedirectService {
    /// `GET /{code}`
    pub async fn handle_redirect(
        req: HttpRequest,
        service: web::Data<ShortenerService>,
        tracker: web::Data<ClickTracker>,
        metrics: web::Data<Arc<dyn MetricsRecorder>>,
    ) -> HttpResponse {
        let code = req.match_info().get("code").unwrap_or_default();

        let target = service.resolve(code).await.and_then(location_for);
        match target {
            Ok(location) => {
                debug!("Redirecting {} -> {:?}", code, location);
                metrics.inc_redirect("302");
                // 不等待点击计数完成
                drop(tracker.track(code));
                HttpResponse::Found()
                    .insert_header((header::LOCATION, location))
                    .finish()
            }
            Err(e) => {
                let response = e.error_response();
                metrics.inc_redirect(response.status().as_str());
                response
            }
        }
    }
}

/// A stored URL is only usable once it is known to be a valid header value.
fn location_for(record: UrlRecord) -> Result<HeaderValue> {
    HeaderValue::try_from(record.original_url).map_err(|e| {
        error!("Stored URL for {} is not a valid Location: {}", record.short_code, e);
        TinylinkError::store_read("Stored URL is not a valid redirect target")
    })
}
