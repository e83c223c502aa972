//! HATEOAS link assembler.
//!
//! Links are pure functions of (verb, route-table entry, path parameters).
//! The route table is the single source of truth for resource segments and
//! child collections; a kind missing from it is an internal misconfiguration
//! surfaced as `AppError::RouteResolution`, and no partial link is ever
//! emitted.

use crate::errors::AppError;
use crate::models::links::Link;
use crate::models::pagination::PageMetadata;

/// Every linkable resource kind in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Category,
    Playlist,
    Song,
    Vehicle,
    Trip,
    FuelRecord,
    MaintenanceRecord,
    Location,
}

/// One route-table row: the URL segment for the kind plus its child
/// collections as `(rel, segment)` pairs, in emission order.
struct RouteEntry {
    kind: ResourceKind,
    segment: &'static str,
    children: &'static [(&'static str, &'static str)],
}

static ROUTE_TABLE: &[RouteEntry] = &[
    RouteEntry {
        kind: ResourceKind::Category,
        segment: "categories",
        children: &[("playlists", "playlists")],
    },
    RouteEntry {
        kind: ResourceKind::Playlist,
        segment: "playlists",
        children: &[("songs", "songs")],
    },
    RouteEntry {
        kind: ResourceKind::Song,
        segment: "songs",
        children: &[],
    },
    RouteEntry {
        kind: ResourceKind::Vehicle,
        segment: "vehicles",
        children: &[
            ("trips", "trips"),
            ("fuelRecords", "fuelRecords"),
            ("maintenanceRecords", "maintenanceRecords"),
        ],
    },
    RouteEntry {
        kind: ResourceKind::Trip,
        segment: "trips",
        children: &[],
    },
    RouteEntry {
        kind: ResourceKind::FuelRecord,
        segment: "fuelRecords",
        children: &[],
    },
    RouteEntry {
        kind: ResourceKind::MaintenanceRecord,
        segment: "maintenanceRecords",
        children: &[],
    },
    RouteEntry {
        kind: ResourceKind::Location,
        segment: "locations",
        children: &[],
    },
];

fn resolve(kind: ResourceKind) -> Result<&'static RouteEntry, AppError> {
    ROUTE_TABLE
        .iter()
        .find(|entry| entry.kind == kind)
        .ok_or_else(|| AppError::RouteResolution(format!("No route entry for {kind:?}")))
}

/// Request context for link assembly.
#[derive(Debug, Clone)]
pub struct LinkContext {
    /// Path prefix up to (excluding) the resource's own collection segment,
    /// e.g. `/api/v1` for a category or `/api/v1/categories/5` for a playlist.
    pub parent_path: String,
    /// Whether the caller may mutate the resource (owner or admin).
    pub can_modify: bool,
}

impl LinkContext {
    pub fn new(parent_path: impl Into<String>, can_modify: bool) -> Self {
        Self {
            parent_path: parent_path.into(),
            can_modify,
        }
    }
}

/// Collection path for a kind under the context's parent path.
pub fn collection_path(kind: ResourceKind, parent_path: &str) -> Result<String, AppError> {
    let entry = resolve(kind)?;
    Ok(format!("{parent_path}/{}", entry.segment))
}

/// Links for a single resource: `self` (GET); `edit` (PUT) and `remove`
/// (DELETE) only when the caller may modify; then one GET link per declared
/// child collection. Order is fixed for deterministic clients.
pub fn resource_links(
    kind: ResourceKind,
    id: i64,
    ctx: &LinkContext,
) -> Result<Vec<Link>, AppError> {
    let entry = resolve(kind)?;
    let self_href = format!("{}/{}/{id}", ctx.parent_path, entry.segment);

    let mut links = vec![Link::new(self_href.clone(), "self", "GET")];
    if ctx.can_modify {
        links.push(Link::new(self_href.clone(), "edit", "PUT"));
        links.push(Link::new(self_href.clone(), "remove", "DELETE"));
    }
    for (rel, segment) in entry.children {
        links.push(Link::new(format!("{self_href}/{segment}"), rel, "GET"));
    }
    Ok(links)
}

/// Href for a specific page of a collection.
pub fn page_href(collection: &str, page_number: i64, page_size: i64) -> String {
    format!("{collection}?pageNumber={page_number}&pageSize={page_size}")
}

/// Previous/next page hrefs, present only when the metadata says so.
/// Also feeds the `Pagination` response header.
pub fn page_nav_hrefs(collection: &str, meta: &PageMetadata) -> (Option<String>, Option<String>) {
    let previous = meta
        .has_previous
        .then(|| page_href(collection, meta.current_page - 1, meta.page_size));
    let next = meta
        .has_next
        .then(|| page_href(collection, meta.current_page + 1, meta.page_size));
    (previous, next)
}

/// Links for a page: `self`, then `previousPage`/`nextPage` when they exist,
/// in that order.
pub fn page_links(collection: &str, meta: &PageMetadata) -> Vec<Link> {
    let (previous, next) = page_nav_hrefs(collection, meta);
    let mut links = vec![Link::new(
        page_href(collection, meta.current_page, meta.page_size),
        "self",
        "GET",
    )];
    if let Some(href) = previous {
        links.push(Link::new(href, "previousPage", "GET"));
    }
    if let Some(href) = next {
        links.push(Link::new(href, "nextPage", "GET"));
    }
    links
}
