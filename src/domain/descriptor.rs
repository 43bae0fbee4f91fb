//! Input describing one outgoing API call.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// HTTP methods accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a JSON body.
    pub fn sends_json(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single, stateless API call.
///
/// Built with the method constructors and refined with the `with_*` and flag
/// methods:
///
/// ```
/// use admin_console::domain::RequestDescriptor;
/// use serde_json::json;
///
/// let d = RequestDescriptor::post("/menus", json!({"name": "System"})).not_notify();
/// assert_eq!(d.path, "/menus");
/// assert!(d.not_notify);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    /// Fixed path relative to the API prefix, e.g. `/menus`.
    pub path: String,
    /// Path segments appended after `path`, percent-encoded on send.
    pub segments: Vec<String>,
    pub method: HttpMethod,
    /// JSON body; only transmitted for POST and PUT.
    pub body: Option<Value>,
    /// Flat query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Suppress the user-visible error notification.
    pub not_notify: bool,
    /// A 2xx body of this call is a token payload to persist.
    pub issues_credential: bool,
    /// Do not refresh a near-expiry credential before this call.
    pub skip_refresh: bool,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            ..Default::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Appends one path segment, typically a record id.
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends every field of `params` as a query parameter.
    ///
    /// `params` must serialize to a flat object. `null` fields are skipped,
    /// strings are used verbatim and other scalars use their JSON rendering.
    /// Nested arrays and objects are joined or rendered as JSON text.
    pub fn with_query<Q: Serialize>(mut self, params: &Q) -> Self {
        if let Ok(Value::Object(map)) = serde_json::to_value(params) {
            for (key, value) in map {
                if let Some(value) = query_value(&value) {
                    self.query.push((key, value));
                }
            }
        }
        self
    }

    pub fn not_notify(mut self) -> Self {
        self.not_notify = true;
        self
    }

    pub fn issues_credential(mut self) -> Self {
        self.issues_credential = true;
        self
    }

    pub fn skip_refresh(mut self) -> Self {
        self.skip_refresh = true;
        self
    }

    /// Unencoded path plus segments, for logs and session events.
    pub fn route(&self) -> String {
        let mut route = self.path.clone();
        for segment in &self.segments {
            route.push('/');
            route.push_str(segment);
        }
        route
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Params {
        #[serde(rename = "type")]
        kind: &'static str,
        current: u32,
        name: Option<String>,
        ids: Vec<&'static str>,
    }

    #[test]
    fn test_default_method_is_get() {
        let d = RequestDescriptor::default();
        assert_eq!(d.method, HttpMethod::Get);
        assert!(!d.not_notify);
    }

    #[test]
    fn test_with_query_flattens_and_skips_null() {
        let d = RequestDescriptor::get("/menus").with_query(&Params {
            kind: "page",
            current: 2,
            name: None,
            ids: vec!["a", "b"],
        });
        assert_eq!(
            d.query,
            vec![
                ("current".to_string(), "2".to_string()),
                ("ids".to_string(), "a,b".to_string()),
                ("type".to_string(), "page".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_query_ignores_non_objects() {
        let d = RequestDescriptor::get("/x").with_query(&json!([1, 2]));
        assert!(d.query.is_empty());
    }

    #[test]
    fn test_route_joins_segments() {
        let d = RequestDescriptor::patch("/roles")
            .with_segment("r1")
            .with_segment("enable");
        assert_eq!(d.path, "/roles");
        assert_eq!(d.route(), "/roles/r1/enable");
        assert_eq!(RequestDescriptor::get("/menus").route(), "/menus");
    }

    #[test]
    fn test_json_methods() {
        assert!(HttpMethod::Post.sends_json());
        assert!(HttpMethod::Put.sends_json());
        assert!(!HttpMethod::Patch.sends_json());
        assert!(!HttpMethod::Get.sends_json());
        assert!(!HttpMethod::Delete.sends_json());
    }
}
