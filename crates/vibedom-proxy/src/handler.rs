//! `hudsucker::HttpHandler` glue: this is the only place that touches the
//! proxy's wire types directly. Everything it does is delegate to the pure
//! functions in [`crate::addon`], kept separate so the request lifecycle is
//! testable without standing up a real MITM proxy.

use crate::addon::{scrub_body, EgressFilter, BLOCKED_RESPONSE_BODY};
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use hudsucker::{Body, HttpContext, HttpHandler, RequestOrResponse};
use hyper::{Request, Response};

impl HttpHandler for EgressFilter {
    async fn handle_request(&mut self, ctx: &HttpContext, req: Request<Body>) -> RequestOrResponse {
        let method = req.method().to_string();
        let host_header = req
            .headers()
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let connect_target = Some(ctx.client_addr.to_string());
        let original_url = req.uri().to_string();

        let decision = crate::addon::evaluate_request(
            &original_url,
            host_header.as_deref(),
            connect_target.as_deref(),
            &self.patterns,
            &self.whitelist,
        );

        if !decision.allowed {
            self.audit_request(&method, host_header.as_deref().unwrap_or(""), &decision, &[]);
            let response = Response::builder()
                .status(StatusCode::FORBIDDEN)
                .header(http::header::CONTENT_TYPE, "text/plain")
                .body(Body::from(BLOCKED_RESPONSE_BODY))
                .expect("static blocked-response body is always valid");
            return RequestOrResponse::Response(response);
        }

        let (parts, body) = req.into_parts();
        let content_type = parts.headers.get(http::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_string);
        let body_bytes = body.collect().await.map(|collected| collected.to_bytes()).unwrap_or_default();

        let (scrubbed_body, body_findings) = scrub_body(content_type.as_deref(), &body_bytes, &self.patterns);

        self.audit_request(&method, host_header.as_deref().unwrap_or(""), &decision, &body_findings);

        let mut builder = Request::builder().method(parts.method).uri(decision.final_url.parse::<http::Uri>().unwrap_or(parts.uri));
        *builder.headers_mut().expect("builder is fresh, headers always present") = parts.headers;
        let rebuilt = builder
            .body(Body::from(Full::from(scrubbed_body)))
            .expect("headers and method were copied from a valid request");

        RequestOrResponse::Request(rebuilt)
    }
}
