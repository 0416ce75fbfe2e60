//! Request/response dumps for debugging API traffic
//!
//! Enabled when `MORPHEUS_API_HTTPTRACE` is present in the environment,
//! whatever its value.

use crate::error::Result;
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::ResponseBuilderExt;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use std::fmt::Write as _;
use std::sync::Arc;

pub const HTTP_TRACE_ENV: &str = "MORPHEUS_API_HTTPTRACE";

pub fn is_enabled() -> bool {
    std::env::var_os(HTTP_TRACE_ENV).is_some()
}

/// Logs every request and response at `INFO`
pub struct TraceTransport {
    inner: Arc<dyn Transport>,
}

impl TraceTransport {
    pub fn new(inner: Arc<dyn Transport>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Transport for TraceTransport {
    async fn round_trip(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        match dump_request(&request) {
            Some(dump) => tracing::info!("\n\n->TX\n\n{}--\n", dump),
            None => tracing::error!("Error tracing request: body cannot be dumped"),
        }

        let response = self.inner.round_trip(request).await?;

        let status = response.status();
        let version = response.version();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut dump = format!("{:?} {}\n", version, status);
        write_headers(&mut dump, &headers);
        dump.push('\n');
        dump.push_str(&String::from_utf8_lossy(&body));
        tracing::info!("\n\n<-RX\n\n{}\n--\n", dump);

        let mut builder = http::Response::builder()
            .status(status)
            .version(version)
            .url(url);
        if let Some(h) = builder.headers_mut() {
            *h = headers;
        }
        Ok(reqwest::Response::from(builder.body(body)?))
    }
}

/// `None` when the body is a stream
fn dump_request(request: &reqwest::Request) -> Option<String> {
    let mut dump = format!("{} {} {:?}\n", request.method(), request.url(), request.version());
    write_headers(&mut dump, request.headers());
    dump.push('\n');
    if let Some(body) = request.body() {
        let bytes = body.as_bytes()?;
        dump.push_str(&String::from_utf8_lossy(bytes));
        dump.push('\n');
    }
    Some(dump)
}

fn write_headers(dump: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        if name == AUTHORIZATION || value.is_sensitive() {
            let _ = writeln!(dump, "{}: [REDACTED]", name);
        } else {
            let _ = writeln!(dump, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()));
        }
    }
}
