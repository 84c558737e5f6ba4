//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/categories/{category_id}', use [format_endpoint].

/// The root route, which reports that the API is up.
pub const ROOT: &str = "/";
/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list operations of one category type and create operations.
pub const OPERATIONS: &str = "/api/operations";
/// The route to list operations of every type together with their categories.
pub const ALL_OPERATIONS: &str = "/api/operations/all";
/// The route to access a single operation.
pub const OPERATION: &str = "/api/operations/{operation_id}";
/// The route for income and expense totals.
pub const ANALYTICS: &str = "/api/analytics";
/// The route for per-category totals.
pub const ANALYTICS_BY_CATEGORY: &str = "/api/analytics/categories";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/operations/{operation_id}', '{operation_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::OPERATIONS);
        assert_endpoint_is_valid_uri(endpoints::ALL_OPERATIONS);
        assert_endpoint_is_valid_uri(endpoints::ANALYTICS);
        assert_endpoint_is_valid_uri(endpoints::ANALYTICS_BY_CATEGORY);

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::OPERATION, 1));
    }

    #[test]
    fn format_endpoint_replaces_parameter() {
        assert_eq!(
            format_endpoint(endpoints::OPERATION, 42),
            "/api/operations/42"
        );
        assert_eq!(
            format_endpoint("/api/categories/{category_id}/operations", 7),
            "/api/categories/7/operations"
        );
    }

    #[test]
    fn format_endpoint_without_parameter_is_unchanged() {
        assert_eq!(
            format_endpoint(endpoints::CATEGORIES, 1),
            endpoints::CATEGORIES
        );
    }
}
