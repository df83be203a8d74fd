//! Body rewriting for documentation served below `/docs`.

use serde_json::{json, Map, Value};

use crate::error::AppError;

const SCHEMA_URL: &str = "/openapi.json";
const DOCS_PREFIX: &str = "/docs";
const API_PREFIX: &str = "/api";

/// Points the docs page at `/docs/openapi.json` instead of the bare `/openapi.json`.
///
/// This is a literal substring substitution, not an HTML-aware one. It
/// differs from a blind replace-all in one way: occurrences already
/// preceded by `/docs` are left alone, so rewriting an already rewritten
/// page is a no-op instead of producing `/docs/docs/openapi.json`. Pages
/// that only reference the bare form come out identical either way.
pub fn rewrite_html(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + 32);
    let mut last = 0;
    for (idx, _) in body.match_indices(SCHEMA_URL) {
        out.push_str(&body[last..idx]);
        if !body[..idx].ends_with(DOCS_PREFIX) {
            out.push_str(DOCS_PREFIX);
        }
        out.push_str(SCHEMA_URL);
        last = idx + SCHEMA_URL.len();
    }
    out.push_str(&body[last..]);
    out
}

/// An OpenAPI document whose `paths` is an object and whose `servers`, if
/// present, is a list or null.
///
/// Members keep their document order; only `paths` keys and a non-null
/// `servers` are touched by [`OpenApiSchema::remount`].
#[derive(Debug)]
pub struct OpenApiSchema {
    document: Map<String, Value>,
}

impl OpenApiSchema {
    pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
        let document: Map<String, Value> = serde_json::from_slice(body)?;

        if !matches!(document.get("paths"), Some(Value::Object(_))) {
            return Err(invalid("`paths` must be an object"));
        }
        if !matches!(
            document.get("servers"),
            None | Some(Value::Null) | Some(Value::Array(_))
        ) {
            return Err(invalid("`servers` must be a list"));
        }

        Ok(Self { document })
    }

    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.document.get("paths").and_then(Value::as_object)
    }

    /// Mounts every route under `/api` and pins a non-null `servers` to the public URL.
    pub fn remount(mut self, public_url: &str) -> Self {
        if let Some(Value::Object(paths)) = self.document.get_mut("paths") {
            *paths = std::mem::take(paths)
                .into_iter()
                .map(|(route, operations)| (format!("{}{}", API_PREFIX, route), operations))
                .collect();
        }
        if let Some(servers) = self.document.get_mut("servers") {
            if !servers.is_null() {
                *servers = json!([{ "url": public_url }]);
            }
        }
        self
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, AppError> {
        Ok(serde_json::to_vec(&self.document)?)
    }
}

fn invalid(reason: &str) -> AppError {
    AppError::SchemaParse(serde::de::Error::custom(reason))
}

/// Decodes, remounts and re-encodes an OpenAPI schema document.
pub fn rewrite_schema(body: &[u8], public_url: &str) -> Result<Vec<u8>, AppError> {
    OpenApiSchema::from_slice(body)?.remount(public_url).to_vec()
}
