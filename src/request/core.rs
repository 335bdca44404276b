use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Query parameter used as a path fallback when the transport cannot supply
/// path-info style routing (`index.php?_r=/courses` instead of
/// `index.php/courses`).
pub const PATH_FALLBACK_PARAM: &str = "_r";

/// Raw values handed over by the transport layer.
///
/// The core never touches sockets or superglobals: whatever host embeds it
/// fills this struct from its own request representation.
#[derive(Debug, Clone, Default)]
pub struct TransportInputs {
    /// HTTP method, as supplied.
    pub method: String,
    /// Full request URI including the script path and query string, if known.
    pub request_uri: Option<String>,
    /// Extra path after the script name (CGI `PATH_INFO`), if any.
    pub path_info: Option<String>,
    /// Script path handling the request, e.g. `/index.php`.
    pub script_name: Option<String>,
    /// Raw query string, without the leading `?`.
    pub query_string: Option<String>,
    /// Headers with case preserved as supplied by the transport.
    pub headers: Vec<(String, String)>,
    /// Raw request body.
    pub body: String,
}

/// A normalized request. Constructed once per incoming call by
/// [`normalize`]; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// HTTP verb.
    pub verb: Method,
    /// Routed path, percent-decoded, always starting with `/`.
    pub path: String,
    /// Raw body as received.
    pub raw_body: String,
    /// Body parsed as JSON, present only when the content type is exactly
    /// `application/json` and the body parses.
    pub body: Option<Value>,
    /// Query parameters. Multi-valued parameters are not modeled; the last
    /// occurrence wins.
    pub query: HashMap<String, String>,
    /// Headers with case preserved; use [`Request::header`] for lookup.
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Case-insensitive header lookup over case-preserving storage.
    #[inline]
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Parse a raw query string into a parameter map.
#[must_use]
pub fn parse_query(query_string: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query_string.as_bytes())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Percent-decode a path fragment, falling back to the raw input when the
/// encoding is invalid.
fn decode_path(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Work out the routed path from the transport inputs.
///
/// Two invocation styles are supported: path-info style
/// (`/index.php/courses/7`) and the query fallback (`/index.php?_r=/courses/7`).
/// Anything that yields no path, or a path not starting with `/`, becomes `/`.
fn requested_path(inputs: &TransportInputs, query: &HashMap<String, String>) -> String {
    let script = inputs.script_name.as_deref().unwrap_or("");

    // Path-info style takes precedence when the request URI visibly embeds
    // slash arguments after the script name.
    let has_forced_slash_args = !script.is_empty()
        && inputs
            .request_uri
            .as_deref()
            .is_some_and(|uri| uri.contains(&format!("{script}/")))
        && inputs.path_info.as_deref().is_some_and(|p| !p.is_empty());

    let mut relative: Option<String> = None;
    if !has_forced_slash_args {
        relative = query
            .get(PATH_FALLBACK_PARAM)
            .filter(|p| !p.is_empty())
            .cloned();
    }

    if relative.is_none() {
        if let Some(info) = inputs.path_info.as_deref().filter(|p| !p.is_empty()) {
            // Some transports prepend the script name to PATH_INFO.
            let stripped = if !script.is_empty() && info.starts_with(script) {
                &info[script.len()..]
            } else {
                info
            };
            relative = Some(decode_path(stripped));
        }
    }

    match relative {
        Some(path) if path.starts_with('/') => path,
        _ => "/".to_string(),
    }
}

/// Build a [`Request`] from transport-level inputs.
///
/// The normalizer itself never fails: an unparseable JSON body simply yields
/// an absent parsed body, and callers relying on it fail validation
/// downstream.
#[must_use]
pub fn normalize(inputs: TransportInputs) -> Request {
    let query = inputs
        .query_string
        .as_deref()
        .map(parse_query)
        .unwrap_or_default();
    let path = requested_path(&inputs, &query);
    let verb = Method::from_bytes(inputs.method.as_bytes()).unwrap_or_default();

    let is_json = inputs
        .headers
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("content-type") && v == "application/json");
    let body = if is_json {
        serde_json::from_str(&inputs.body).ok()
    } else {
        None
    };

    debug!(
        verb = %verb,
        path = %path,
        query_params = query.len(),
        has_json_body = body.is_some(),
        "Request normalized"
    );

    Request {
        verb,
        path,
        raw_body: inputs.body,
        body,
        query,
        headers: inputs.headers,
    }
}

/// Extract the credential token from the `Authorization` header.
///
/// The header is split on spaces: `Authorization: <type> <token>`. A missing
/// or malformed header yields `None`; verifying the token is the
/// authenticator's job.
#[must_use]
pub fn extract_token(request: &Request) -> Option<&str> {
    let header = request.header("Authorization")?;
    let mut parts = header.split(' ');
    let _scheme = parts.next()?;
    parts.next().filter(|token| !token.is_empty())
}
