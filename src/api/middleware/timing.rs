//! HTTP timing middleware
//!
//! Logs every request with its latency and reports it to the metrics
//! recorder, grouped by route so label cardinality stays fixed.

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::metrics_core::MetricsRecorder;

/// HTTP timing middleware factory
#[derive(Clone)]
pub struct TimingMiddleware {
    metrics: Arc<dyn MetricsRecorder>,
}

impl TimingMiddleware {
    pub fn new(metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TimingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TimingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TimingService {
            service: Rc::new(service),
            metrics: Arc::clone(&self.metrics),
        }))
    }
}

pub struct TimingService<S> {
    service: Rc<S>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl<S, B> Service<ServiceRequest> for TimingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let metrics = Arc::clone(&self.metrics);
        let start = Instant::now();

        let endpoint = classify_endpoint(req.method(), req.path());
        let method = req.method().clone();
        let path = req.path().to_string();

        Box::pin(async move {
            let result = srv.call(req).await;

            let millis = start.elapsed().as_secs_f64() * 1000.0;
            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(_) => 500,
            };

            debug!("{} {} -> {} in {:.3}ms", method, path, status, millis);
            metrics.observe_api_latency(endpoint, millis);

            result
        })
    }
}

/// Group a request into one of the routed endpoints.
pub fn classify_endpoint(method: &Method, path: &str) -> &'static str {
    let rest = path.strip_prefix('/').unwrap_or(path);
    if rest == "shorten" {
        return if *method == Method::POST { "/shorten" } else { "other" };
    }
    if *method != Method::GET {
        return "other";
    }
    match rest.strip_prefix("stats/") {
        Some(code) if !code.contains('/') => "/stats/{code}",
        Some(_) => "other",
        None if !rest.contains('/') && !rest.starts_with('_') => "/{code}",
        None => "other",
    }
}
