/// The single segment that asks for the upstream's OpenAPI schema.
pub const SCHEMA_SEGMENT: &str = "openapi.json";

/// Inbound path below `/docs`, split into its non-empty segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPath {
    segments: Vec<String>,
}

impl DocPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Parses the tail captured after `/docs/`, e.g. `swagger-ui/bundle.js`.
    pub fn parse(tail: &str) -> Self {
        Self::new(tail.split('/'))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_schema(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == SCHEMA_SEGMENT
    }

    /// Path to request from the upstream for this inbound path.
    pub fn upstream_path(&self) -> String {
        if self.is_schema() {
            return format!("/{}", SCHEMA_SEGMENT);
        }
        if self.segments.is_empty() {
            return "/docs".to_string();
        }
        format!("/docs/{}", self.segments.join("/"))
    }
}

/// Where a documentation request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub base_url: String,
    pub path: String,
}

impl UpstreamTarget {
    pub fn new(base_url: &str, path: &DocPath) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            path: path.upstream_path(),
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }
}
