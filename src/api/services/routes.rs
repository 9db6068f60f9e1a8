use actix_web::{HttpResponse, web};

use super::{RedirectService, ShortenService, StatsService};
use crate::errors::ErrorBody;

/// Everything the router does not know
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody {
        error: "Not Found".to_string(),
    })
}

/// Register every route of the service.
///
/// Each resource also answers unknown methods with the JSON 404 instead of
/// actix's default 405.
pub fn app_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shorten")
            .route(web::post().to(ShortenService::shorten))
            .default_service(web::to(not_found)),
    )
    .service(
        web::resource(["/stats/{code}", "/stats/"])
            .route(web::get().to(StatsService::stats))
            .default_service(web::to(not_found)),
    );

    #[cfg(feature = "metrics")]
    cfg.service(
        web::resource("/_metrics")
            .route(web::get().to(super::MetricsService::metrics))
            .default_service(web::to(not_found)),
    );

    // 空短码交给 handler 返回 400
    cfg.service(
        web::resource(["/{code}", "/"])
            .route(web::get().to(RedirectService::handle_redirect))
            .default_service(web::to(not_found)),
    )
    .default_service(web::to(not_found));
}
