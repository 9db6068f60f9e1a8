use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::types::StatsResponse;
use crate::errors::TinylinkError;
use crate::services::ShortenerService;

pub struct StatsService;

impl StatsService {
    /// `GET /stats/{code}`
    pub async fn stats(
        req: HttpRequest,
        service: web::Data<ShortenerService>,
    ) -> Result<HttpResponse, TinylinkError> {
        let code = req.match_info().get("code").unwrap_or_default();
        let record = service.stats(code).await?;
        Ok(HttpResponse::Ok().json(StatsResponse::from(record)))
    }
}
