use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use tracing::warn;

use crate::api::types::{ShortenRequest, ShortenResponse};
use crate::errors::TinylinkError;
use crate::services::ShortenerService;

/// 请求体上限
const MAX_BODY_BYTES: usize = 64 * 1024;

pub struct ShortenService;

impl ShortenService {
    /// `POST /shorten`
    ///
    /// The body is read and parsed by hand so oversized or malformed bodies get
    /// the same error body as every other failure.
    pub async fn shorten(
        req: HttpRequest,
        body: web::Payload,
        service: web::Data<ShortenerService>,
    ) -> Result<HttpResponse, TinylinkError> {
        let body = read_body(body).await?;
        let payload: ShortenRequest = serde_json::from_slice(&body).map_err(|e| {
            warn!("Invalid shorten request body: {}", e);
            TinylinkError::parse("Invalid request body")
        })?;

        let request_base = {
            let info = req.connection_info();
            format!("{}://{}", info.scheme(), info.host())
        };

        let result = service
            .shorten(&payload.url, payload.expire_in_days, &request_base)
            .await?;

        Ok(HttpResponse::Created().json(ShortenResponse {
            short_url: result.short_url,
        }))
    }
}

/// Collect the request body, refusing anything over [`MAX_BODY_BYTES`].
async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, TinylinkError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            warn!("Failed to read shorten request body: {}", e);
            TinylinkError::parse("Invalid request body")
        })?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            warn!("Shorten request body exceeds {} bytes", MAX_BODY_BYTES);
            return Err(TinylinkError::parse("Request body too large"));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
