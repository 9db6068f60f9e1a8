//! Prometheus metrics endpoint at `/_metrics`.

use actix_web::HttpResponse;
use tracing::error;

use crate::errors::ErrorBody;
use crate::metrics::METRICS;

pub struct MetricsService;

impl MetricsService {
    pub async fn metrics() -> HttpResponse {
        match METRICS.export() {
            Ok(output) => HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4; charset=utf-8")
                .body(output),
            Err(e) => {
                error!("Failed to encode metrics: {}", e);
                HttpResponse::InternalServerError().json(ErrorBody {
                    error: "Failed to encode metrics".to_string(),
                })
            }
        }
    }
}
