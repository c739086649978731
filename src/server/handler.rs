// src/server/handler.rs
use hyper::{header, Body, Method, Request, Response, StatusCode};
use serde::Serialize;
use std::sync::Arc;
use tower::Service;
use tracing::Instrument;

use crate::config::{ApplicationConfig, ServerConfig};
use crate::health::HealthChecker;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build response: {0}")]
    Http(#[from] hyper::http::Error),
}

/// Serves the liveness and readiness routes for one application.
#[derive(Clone)]
pub struct RequestHandler {
    checker: Arc<HealthChecker>,
    application: Arc<ApplicationConfig>,
    liveness_path: Arc<str>,
    readiness_path: Arc<str>,
}

impl RequestHandler {
    pub fn new(
        checker: Arc<HealthChecker>,
        application: Arc<ApplicationConfig>,
        server: &ServerConfig,
    ) -> Self {
        Self {
            checker,
            application,
            liveness_path: server.liveness_path.as_str().into(),
            readiness_path: server.readiness_path.as_str().into(),
        }
    }

    pub async fn handle(&self, req: Request<Body>) -> Result<Response<Body>, HandlerError> {
        let path = req.uri().path();

        if req.method() != Method::GET {
            return not_found();
        }

        if path == &*self.liveness_path {
            json(&self.checker.simple_check())
        } else if path == &*self.readiness_path {
            let report = self.checker.detailed_check(&self.application).await;
            json(&report)
        } else {
            not_found()
        }
    }
}

fn json<T: Serialize>(body: &T) -> Result<Response<Body>, HandlerError> {
    let body = serde_json::to_vec(body)?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))?)
}

fn not_found() -> Result<Response<Body>, HandlerError> {
    Ok(Response::builder()
        .status(StatusCode::NOT_FOUND)
        .body(Body::from("Not Found"))?)
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Box<dyn std::error::Error + Send + Sync>;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        let span = tracing::info_span!(
            "request",
            id = %uuid::Uuid::new_v4(),
            method = %req.method(),
            path = %req.uri().path(),
        );
        Box::pin(
            async move {
                handler.handle(req).await.map_err(|e| {
                    tracing::error!(%e, "handler error");
                    Box::new(e) as Box<dyn std::error::Error + Send + Sync>
                })
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntegrationConfig, CUSTOM};

    fn handler() -> RequestHandler {
        let application = ApplicationConfig::new("svc", "0.1.0").with_integration(
            IntegrationConfig::new(CUSTOM, "noop", "none").with_handle(|| Ok(())),
        );
        RequestHandler::new(
            Arc::new(HealthChecker::default()),
            Arc::new(application),
            &ServerConfig::default(),
        )
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn liveness_returns_constant_status() {
        let mut handler = handler();
        let req = Request::get("/health-check/liveness").body(Body::empty()).unwrap();
        let response = handler.call(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "fully functional");
    }

    #[tokio::test]
    async fn readiness_returns_report() {
        let mut handler = handler();
        let req = Request::get("/health-check/readiness").body(Body::empty()).unwrap();
        let response = handler.call(req).await.unwrap();

        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["name"], "svc");
        assert_eq!(json["status"], true);
        assert_eq!(json["integrations"][0]["kind"], "Customized test function");
    }

    #[tokio::test]
    async fn other_routes_are_not_found() {
        let mut handler = handler();
        let req = Request::get("/metrics").body(Body::empty()).unwrap();
        assert_eq!(handler.call(req).await.unwrap().status(), StatusCode::NOT_FOUND);

        let req = Request::post("/health-check/liveness").body(Body::empty()).unwrap();
        assert_eq!(handler.call(req).await.unwrap().status(), StatusCode::NOT_FOUND);
    }
}
