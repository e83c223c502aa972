//! Hypermedia link values and the response envelopes that carry them.

use serde::Serialize;

/// A single hypermedia link: `{href, rel, method}`.
///
/// Immutable value constructed per response, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: &str, method: &str) -> Self {
        Self {
            href: href.into(),
            rel: rel.to_string(),
            method: method.to_string(),
        }
    }
}

/// Detail response envelope: `{resource, links}`.
#[derive(Debug, Serialize)]
pub struct ResourceEnvelope<T: Serialize> {
    pub resource: T,
    pub links: Vec<Link>,
}

impl<T: Serialize> ResourceEnvelope<T> {
    pub fn new(resource: T, links: Vec<Link>) -> Self {
        Self { resource, links }
    }
}

/// Page response envelope: `{resources: [{resource, links}], links}`.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T: Serialize> {
    pub resources: Vec<ResourceEnvelope<T>>,
    pub links: Vec<Link>,
}

impl<T: Serialize> PageEnvelope<T> {
    pub fn new(resources: Vec<ResourceEnvelope<T>>, links: Vec<Link>) -> Self {
        Self { resources, links }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_serializes_flat() {
        let link = Link::new("/api/v1/categories/5", "self", "GET");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["href"], "/api/v1/categories/5");
        assert_eq!(json["rel"], "self");
        assert_eq!(json["method"], "GET");
    }

    #[test]
    fn envelope_wraps_resource_and_links() {
        let envelope = ResourceEnvelope::new(
            serde_json::json!({"id": 5, "name": "Rock"}),
            vec![Link::new("/api/v1/categories/5", "self", "GET")],
        );
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["resource"]["name"], "Rock");
        assert_eq!(json["links"][0]["rel"], "self");
    }

    #[test]
    fn page_envelope_shape() {
        let page = PageEnvelope::new(
            vec![ResourceEnvelope::new(
                serde_json::json!({"id": 1}),
                vec![Link::new("/api/v1/vehicles/1", "self", "GET")],
            )],
            vec![Link::new("/api/v1/vehicles?pageNumber=1&pageSize=10", "self", "GET")],
        );
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["resources"].is_array());
        assert_eq!(json["links"][0]["rel"], "self");
    }
}
