//! Structural checks on the routing graph.

use tplg_store::ElementStore;
use tplg_types::{Category, Payload, RouteLine};

use crate::error::{BuildError, BuildResult};

fn exists_in(store: &ElementStore, categories: &[Category], name: &str) -> bool {
    categories.iter().any(|c| store.lookup(*c, name).is_some())
}

/// Check one route: both endpoints must be widgets and a non-empty control
/// must be a mixer or enum control.
pub fn check_route(store: &ElementStore, route: &RouteLine) -> BuildResult<()> {
    let endpoint_error = |role: &'static str, name: &str, expected: &'static str| {
        BuildError::RouteEndpoint {
            route: format!("{}, {}, {}", route.source, route.control, route.sink),
            role,
            name: name.to_string(),
            expected,
        }
    };

    if !exists_in(store, &[Category::Widget], &route.sink) {
        return Err(endpoint_error("sink", &route.sink, "widget"));
    }
    if !exists_in(store, &[Category::Widget], &route.source) {
        return Err(endpoint_error("source", &route.source, "widget"));
    }
    if !route.control.is_empty()
        && !exists_in(store, &[Category::Mixer, Category::Enum], &route.control)
    {
        return Err(endpoint_error("control", &route.control, "mixer or enum control"));
    }
    Ok(())
}

/// Check every route element. Returns the number of routes checked.
pub fn validate_routes(store: &ElementStore) -> BuildResult<usize> {
    let mut checked = 0;
    for elem in store.iter(Category::Route) {
        if let Payload::Route(route) = &elem.payload {
            check_route(store, route)?;
            checked += 1;
        }
    }
    Ok(checked)
}
