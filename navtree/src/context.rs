//! The request side of selection.
//!
//! The tree never talks to a web framework directly. Hosts implement
//! [`RequestContext`] for whatever they have at hand; [`NoRequest`] stands in
//! when nothing is available and [`StaticRequest`] covers plain
//! method + path matching.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// HTTP verb an item's URL is reached with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Method {
    type Error = NavError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl FromStr for Method {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s.trim().to_ascii_lowercase().as_str() {
            "get" => Method::Get,
            "post" => Method::Post,
            "put" => Method::Put,
            "patch" => Method::Patch,
            "delete" => Method::Delete,
            "head" => Method::Head,
            "options" => Method::Options,
            _ => return Err(NavError::InvalidMethod(s.to_string())),
        };
        Ok(method)
    }
}

/// What the navigation needs to know about the request being served.
///
/// Implementations must not fail: when information is missing, return an
/// empty path and report no matches.
pub trait RequestContext {
    /// Path of the current request, or `""` when unavailable.
    fn current_path(&self) -> &str;

    /// Full request URI including the query string, or `""` when unavailable.
    fn request_uri(&self) -> &str {
        ""
    }

    /// Whether `url` (reached with `method`) points at the current request.
    fn matches_current_request(&self, url: &str, method: Option<Method>) -> bool;
}

/// Context used when no request is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequest;

impl RequestContext for NoRequest {
    fn current_path(&self) -> &str {
        ""
    }

    fn matches_current_request(&self, _url: &str, _method: Option<Method>) -> bool {
        false
    }
}

/// A request described by its method, path and optional query string.
///
/// Matching compares normalized paths. Items without a method match `GET`
/// and `HEAD` requests only; an item URL carrying a query string must match
/// the full request URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRequest {
    method: Method,
    path: String,
    uri: String,
}

impl StaticRequest {
    /// A `GET` request for `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method,
            uri: path.clone(),
            path,
        }
    }

    /// Attach a query string (without the leading `?`).
    pub fn with_query(mut self, query: &str) -> Self {
        let query = query.trim_start_matches('?');
        self.uri = if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        };
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }
}

impl RequestContext for StaticRequest {
    fn current_path(&self) -> &str {
        &self.path
    }

    fn request_uri(&self) -> &str {
        &self.uri
    }

    fn matches_current_request(&self, url: &str, method: Option<Method>) -> bool {
        let method_matches = match method {
            Some(m) => m == self.method,
            None => matches!(self.method, Method::Get | Method::Head),
        };
        if !method_matches {
            return false;
        }

        let Some((path, query)) = split_url(url) else {
            return false;
        };

        match query {
            Some(query) => {
                let (current_path, current_query) =
                    self.uri.split_once('?').unwrap_or((self.uri.as_str(), ""));
                normalize_path(&path) == normalize_path(current_path) && query == current_query
            }
            None => normalize_path(&path) == normalize_path(&self.path),
        }
    }
}

/// Split a URL into its path and query, dropping scheme, host and fragment.
fn split_url(url: &str) -> Option<(String, Option<String>)> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    match url::Url::parse(url) {
        Ok(parsed) => Some((
            parsed.path().to_string(),
            parsed.query().filter(|q| !q.is_empty()).map(str::to_string),
        )),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let without_fragment = url.split('#').next().unwrap_or_default();
            let (path, query) = match without_fragment.split_once('?') {
                Some((path, query)) => (path, Some(query)),
                None => (without_fragment, None),
            };
            Some((
                path.to_string(),
                query.filter(|q| !q.is_empty()).map(str::to_string),
            ))
        }
        Err(e) => {
            debug!("ignoring unparsable navigation url {url:?}: {e}");
            None
        }
    }
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}
