//! Proxy rules and request forwarding.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Response, StatusCode, header};
use chunkwise_config::{DevConfig, ProxyConfig};
use url::Url;

use super::{ProxyEvent, ProxyObserver, TransportErrorKind};
use crate::error::{CliError, Result};

pub const DEVELOPMENT_MODE: &str = "development";

/// Permission to skip upstream certificate checks.
///
/// Only [`DevelopmentOnly::for_mode`] hands one out, and only for the
/// development build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevelopmentOnly(());

impl DevelopmentOnly {
    pub fn for_mode(mode: &str) -> Option<Self> {
        (mode == DEVELOPMENT_MODE).then_some(DevelopmentOnly(()))
    }
}

/// One prefix-to-upstream mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct ProxyRule {
    prefix: String,
    rewrite: Option<String>,
    upstream: Url,
    change_origin: bool,
    secure: bool,
    forward_headers: bool,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ProxyRule {
    /// Forward `prefix` to `upstream` unchanged, all headers, certificates checked.
    pub fn new(prefix: impl Into<String>, upstream: Url) -> Self {
        Self {
            prefix: prefix.into(),
            rewrite: None,
            upstream,
            change_origin: false,
            secure: true,
            forward_headers: true,
            headers: HeaderMap::new(),
            timeout: None,
        }
    }

    pub fn from_config(prefix: &str, config: &ProxyConfig) -> Result<Self> {
        let upstream = config.target_url()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                CliError::Proxy(format!("{prefix}: invalid header name '{name}': {err}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|err| {
                CliError::Proxy(format!("{prefix}: invalid value for header '{name}': {err}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            prefix: prefix.to_string(),
            rewrite: config.rewrite.clone(),
            upstream,
            change_origin: config.change_origin,
            secure: config.secure,
            forward_headers: config.forward_headers,
            headers,
            timeout: config.timeout_ms.map(Duration::from_millis),
        })
    }

    /// Replace the matched prefix with `replacement`.
    pub fn with_rewrite(mut self, replacement: impl Into<String>) -> Self {
        self.rewrite = Some(replacement.into());
        self
    }

    pub fn with_change_origin(mut self, change_origin: bool) -> Self {
        self.change_origin = change_origin;
        self
    }

    pub fn with_forward_headers(mut self, forward_headers: bool) -> Self {
        self.forward_headers = forward_headers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upstream(&self) -> &Url {
        &self.upstream
    }

    pub fn rewrite(&self) -> Option<&str> {
        self.rewrite.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Plain prefix match: `/api` also matches `/apiary`.
    pub fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }

    /// The upstream path for an inbound `path`.
    pub fn rewrite_path(&self, path: &str) -> String {
        let Some(replacement) = &self.rewrite else {
            return path.to_string();
        };
        let rest = path.strip_prefix(self.prefix.as_str()).unwrap_or(path);
        let rewritten = format!("{replacement}{rest}");
        if rewritten.starts_with('/') {
            rewritten
        } else {
            format!("/{rewritten}")
        }
    }

    /// Full upstream URL. A path on the upstream base is kept in front.
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> Url {
        let mut url = self.upstream.clone();
        let base = self.upstream.path().trim_end_matches('/');
        url.set_path(&format!("{base}{path}"));
        url.set_query(query);
        url
    }

    fn authority(&self) -> String {
        let host = self.upstream.host_str().unwrap_or_default();
        match self.upstream.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    fn outbound_headers(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut headers = if self.forward_headers {
            end_to_end_headers(inbound)
        } else {
            let mut kept = HeaderMap::new();
            for name in [header::CONTENT_TYPE, header::ACCEPT] {
                for value in inbound.get_all(&name) {
                    kept.append(name.clone(), value.clone());
                }
            }
            kept
        };

        // The body is re-sent from a buffer; the client computes its length.
        headers.remove(header::CONTENT_LENGTH);

        if self.change_origin
            && let Ok(host) = HeaderValue::from_str(&self.authority())
        {
            headers.insert(header::HOST, host);
        }
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }
}

/// Proxy rules, tried longest prefix first.
#[derive(Debug, Clone, Default)]
pub struct ProxyRules {
    rules: Vec<ProxyRule>,
}

impl ProxyRules {
    pub fn new(mut rules: Vec<ProxyRule>) -> Self {
        rules.sort_by(|a, b| {
            b.prefix
                .len()
                .cmp(&a.prefix.len())
                .then_with(|| a.prefix.cmp(&b.prefix))
        });
        Self { rules }
    }

    pub fn from_config(dev: &DevConfig) -> Result<Self> {
        let rules = dev
            .proxy
            .iter()
            .map(|(prefix, config)| ProxyRule::from_config(prefix, config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(rules))
    }

    pub fn find(&self, path: &str) -> Option<&ProxyRule> {
        self.rules.iter().find(|rule| rule.matches(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProxyRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Sends matched requests upstream and relays the answer.
pub struct Forwarder {
    client: reqwest::Client,
    insecure_client: Option<reqwest::Client>,
    observers: Vec<Arc<dyn ProxyObserver>>,
}

impl Forwarder {
    /// Without a [`DevelopmentOnly`] token every upstream certificate is
    /// verified, whatever the rules say.
    pub fn new(development: Option<DevelopmentOnly>) -> Result<Self> {
        let client = client_builder()
            .build()
            .map_err(|err| CliError::Proxy(format!("failed to create HTTP client: {err}")))?;

        let insecure_client = match development {
            Some(_) => Some(
                client_builder()
                    .danger_accept_invalid_certs(true)
                    .build()
                    .map_err(|err| {
                        CliError::Proxy(format!("failed to create HTTP client: {err}"))
                    })?,
            ),
            None => None,
        };

        Ok(Self {
            client,
            insecure_client,
            observers: Vec::new(),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProxyObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Whether rules with `secure = false` actually skip certificate checks.
    pub fn allows_insecure(&self) -> bool {
        self.insecure_client.is_some()
    }

    fn client_for(&self, rule: &ProxyRule) -> &reqwest::Client {
        match &self.insecure_client {
            Some(insecure) if !rule.secure => insecure,
            _ => &self.client,
        }
    }

    fn notify(&self, event: ProxyEvent) {
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }

    /// Forward `request` according to `rule`.
    ///
    /// Never fails: transport errors become `502 Bad Gateway`, timeouts
    /// `504 Gateway Timeout`, both with a plain-text body.
    pub async fn forward(&self, rule: &ProxyRule, request: Request<Body>) -> Response<Body> {
        let (parts, body) = request.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_string();
        let url = rule.upstream_url(&rule.rewrite_path(&path), parts.uri.query());

        let body = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(body) => body,
            Err(err) => {
                return plain_text(
                    StatusCode::BAD_REQUEST,
                    format!("Could not read request body: {err}\n"),
                );
            }
        };

        self.notify(ProxyEvent::RequestForwarded {
            method: method.clone(),
            path: path.clone(),
            upstream: url.clone(),
        });

        let started = Instant::now();
        let mut outbound = self
            .client_for(rule)
            .request(method.clone(), url)
            .headers(rule.outbound_headers(&parts.headers))
            .body(body);
        if let Some(timeout) = rule.timeout {
            outbound = outbound.timeout(timeout);
        }

        let relayed = match outbound.send().await {
            Ok(upstream) => {
                let status = upstream.status();
                let headers = end_to_end_headers(upstream.headers());
                upstream.bytes().await.map(|body| (status, headers, body))
            }
            Err(err) => Err(err),
        };

        match relayed {
            Ok((status, headers, body)) => {
                self.notify(ProxyEvent::ResponseReceived {
                    method,
                    path,
                    status,
                    latency: started.elapsed(),
                });
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                *response.headers_mut() = headers;
                response
            }
            Err(err) => {
                let kind = transport_error_kind(&err);
                let message = error_chain(&err);
                let status = kind.status();
                let body = format!(
                    "{}: upstream request for {path} failed ({message})\n",
                    status.canonical_reason().unwrap_or("Proxy Error"),
                );
                self.notify(ProxyEvent::TransportError {
                    method,
                    path,
                    kind,
                    message,
                });
                plain_text(status, body)
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("allows_insecure", &self.allows_insecure())
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn client_builder() -> reqwest::ClientBuilder {
    // Redirects are relayed to the browser, not followed.
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
}

fn transport_error_kind(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Other
    }
}

/// `err` and its sources, e.g. "error sending request: connection refused".
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "proxy-connection"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// `headers` without hop-by-hop headers, including those named in `Connection`.
fn end_to_end_headers(headers: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect();

    headers
        .iter()
        .filter(|(name, _)| !is_hop_by_hop(name) && !listed.iter().any(|l| l == name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn plain_text(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
