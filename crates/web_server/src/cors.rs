use std::{
    future::{Ready, ready},
    rc::Rc,
};

use actix_web::{
    Error, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{Method, header, header::HeaderValue},
};
use futures_util::future::LocalBoxFuture;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Cross-origin gate for the API.
///
/// Browsers from whitelisted origins get their `OPTIONS` preflight
/// answered with a 200 before authentication runs, and the matching
/// `Access-Control-Allow-Origin` echoed on every response. Requests from
/// other origins pass through without CORS headers.
pub struct CorsGate {
    allowed_origins: Vec<String>,
}

impl CorsGate {
    /// Creates a gate allowing exactly the given origins
    pub fn new(allowed_origins: Vec<String>) -> Self {
        Self { allowed_origins }
    }

    /// Creates a gate from the comma-separated `ALLOWED_ORIGINS` variable,
    /// falling back to the local development origins
    pub fn from_env() -> Self {
        let raw = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,https://localhost:3443".to_string());

        Self::new(parse_origins(&raw))
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

impl<S, B> Transform<S, ServiceRequest> for CorsGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsGateService {
            service: Rc::new(service),
            allowed_origins: Rc::new(self.allowed_origins.clone()),
        }))
    }
}

/// Service that implements the cross-origin gate logic
pub struct CorsGateService<S> {
    service: Rc<S>,
    allowed_origins: Rc<Vec<String>>,
}

impl<S, B> Service<ServiceRequest> for CorsGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let allowed_origins = self.allowed_origins.clone();

        Box::pin(async move {
            let origin = req
                .headers()
                .get(header::ORIGIN)
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());
            let allowed = origin
                .as_deref()
                .map(|origin| allowed_origins.iter().any(|candidate| candidate == origin))
                .unwrap_or(false);

            // Preflight is answered here; it never carries credentials, so
            // it must not reach the authentication guard.
            if req.method() == Method::OPTIONS {
                let mut builder = HttpResponse::Ok();
                if allowed {
                    if let Some(origin) = &origin {
                        builder
                            .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.as_str()));
                    }
                    builder.insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, ALLOWED_METHODS));
                    builder.insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS));
                    builder.insert_header((header::VARY, "Origin"));
                }
                let response = builder.finish();
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            if allowed {
                if let Some(origin) = &origin {
                    if let Ok(value) = HeaderValue::from_str(origin) {
                        res.headers_mut()
                            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                    }
                    res.headers_mut()
                        .insert(header::VARY, HeaderValue::from_static("Origin"));
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}
