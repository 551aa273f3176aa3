//! Request description handed to a [`super::Gateway`].

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use bloodbridge_core::error::REQUEST_FAILED_MESSAGE;
use bloodbridge_core::result::AppResult;

/// HTTP method supported by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Return the method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One backend call: method, relative path, query, optional JSON body and
/// optional API token.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the backend origin, e.g. `/api/requests/`.
    pub path: String,
    /// Query parameters, sent in order.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Token for the `Authorization: Token <t>` header.
    pub token: Option<String>,
    /// Message used when the server rejects the call without one.
    pub fallback: String,
}

impl ApiRequest {
    /// Create a request with no query, body, or token.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            token: None,
            fallback: REQUEST_FAILED_MESSAGE.to_string(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Shorthand for a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Shorthand for a PATCH request.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    /// Shorthand for a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters.
    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> AppResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Attach the API token when one is available.
    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Override the rejection fallback message.
    pub fn fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = message.into();
        self
    }

    /// Path plus encoded query string, e.g. `/api/donors/?page=2&bloodGroup=O%2B`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, encode_query(&self.query))
        }
    }
}

/// Encode pairs as `k=v&k=v`, percent-encoding keys and values.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
