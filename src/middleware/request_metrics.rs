use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use log::debug;

use crate::metrics::Metrics;

pub const PROCESSING_TIME_HEADER: &str = "x-processing-time-micros";

/// Label for requests that matched no route, keeps path cardinality bounded
const UNMATCHED_PATH: &str = "unmatched";

/// Records count, errors, latency and concurrency of every request into
/// [`Metrics`], and reports the handling time in a response header.
pub struct RequestMetrics {
    metrics: Arc<Metrics>,
}

impl RequestMetrics {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestMetricsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestMetricsMiddleware {
            service: Rc::new(service),
            metrics: Arc::clone(&self.metrics),
        })
    }
}

/// Holds one slot of the in-flight gauge; released on drop, so a request
/// future cancelled mid-flight still gives its slot back
struct InFlight<'a> {
    metrics: &'a Metrics,
}

impl<'a> InFlight<'a> {
    fn enter(metrics: &'a Metrics) -> Self {
        metrics.http_requests_in_flight.inc();
        Self { metrics }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.metrics.http_requests_in_flight.dec();
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: Rc<S>,
    metrics: Arc<Metrics>,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let metrics = Arc::clone(&self.metrics);

        let method = req.method().to_string();
        debug!("Processing request: {} {}", method, req.path());

        Box::pin(async move {
            let start = Instant::now();
            let in_flight = InFlight::enter(&metrics);
            let result = service.call(req).await;
            drop(in_flight);

            let mut res = result?;
            let elapsed = start.elapsed();
            let status = res.status();
            let path = res
                .request()
                .match_pattern()
                .unwrap_or_else(|| UNMATCHED_PATH.to_string());

            metrics.observe_request(&method, &path, status.as_u16(), elapsed.as_secs_f64());
            res.headers_mut().insert(
                HeaderName::from_static(PROCESSING_TIME_HEADER),
                HeaderValue::from(elapsed.as_micros() as u64),
            );

            debug!("Response: {} {} - status: {}", method, path, status);
            Ok(res)
        })
    }
}
