//! Response headers for alerts and pagination

use crate::core::query::Page;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Uri, header};

/// Builds the `X-{app}-Alert` / `X-{app}-Params` headers sent on mutations
#[derive(Debug, Clone)]
pub struct HeaderUtil {
    application_name: String,
}

impl HeaderUtil {
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            application_name: application_name.into(),
        }
    }

    pub fn alert_header_name(&self) -> String {
        format!("x-{}-alert", self.application_name.to_ascii_lowercase())
    }

    pub fn params_header_name(&self) -> String {
        format!("x-{}-params", self.application_name.to_ascii_lowercase())
    }

    /// Alert key `{app}.{entity}.{action}` with the id as parameter
    pub fn alert(&self, entity_name: &str, action: &str, param: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let message = format!("{}.{}.{}", self.application_name, entity_name, action);
        insert(&mut headers, &self.alert_header_name(), &message);
        insert(&mut headers, &self.params_header_name(), param);
        headers
    }

    pub fn entity_created(&self, entity_name: &str, id: i64) -> HeaderMap {
        self.alert(entity_name, "created", &id.to_string())
    }

    pub fn entity_updated(&self, entity_name: &str, id: i64) -> HeaderMap {
        self.alert(entity_name, "updated", &id.to_string())
    }

    pub fn entity_deleted(&self, entity_name: &str, id: i64) -> HeaderMap {
        self.alert(entity_name, "deleted", &id.to_string())
    }
}

/// Names or values that are not valid HTTP are skipped.
fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    match (HeaderName::try_from(name), HeaderValue::from_str(value)) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!("Skipping invalid header {}: {}", name, value),
    }
}

/// `X-Total-Count` plus an RFC 5988 `Link` header with next, prev, last and
/// first relations
///
/// Links reuse the request path and every query parameter except `page` and
/// `size`, which are replaced.
pub fn pagination_headers<T>(uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-total-count"),
        HeaderValue::from(page.total_elements),
    );

    let retained: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|part| !part.is_empty())
        .filter(|part| {
            let key = part.split('=').next().unwrap_or_default();
            key != "page" && key != "size"
        })
        .collect();
    let link = |number: usize, rel: &str| {
        let mut query = retained.join("&");
        if !query.is_empty() {
            query.push('&');
        }
        format!(
            "<{}?{}page={}&size={}>; rel=\"{}\"",
            uri.path(),
            query,
            number,
            page.size,
            rel
        )
    };

    let mut links = Vec::new();
    if page.has_next() {
        links.push(link(page.number.saturating_add(1), "next"));
    }
    if page.has_previous() {
        links.push(link(page.number - 1, "prev"));
    }
    links.push(link(page.total_pages().saturating_sub(1), "last"));
    links.push(link(0, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(header::LINK, value);
    }
    headers
}
