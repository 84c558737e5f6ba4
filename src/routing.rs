//! Application router configuration.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::{
    AppState,
    analytics::{get_category_breakdown_endpoint, get_summary_endpoint},
    category::{
        create_category_endpoint, delete_category_endpoint, get_category_endpoint,
        list_categories_endpoint, update_category_endpoint,
    },
    endpoints,
    not_found::get_404_not_found,
    operation::{
        create_operation_endpoint, delete_operation_endpoint, get_operation_endpoint,
        list_all_operations_endpoint, list_operations_endpoint, update_operation_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::OPERATIONS,
            get(list_operations_endpoint).post(create_operation_endpoint),
        )
        .route(endpoints::ALL_OPERATIONS, get(list_all_operations_endpoint))
        .route(
            endpoints::OPERATION,
            get(get_operation_endpoint)
                .put(update_operation_endpoint)
                .delete(delete_operation_endpoint),
        )
        .route(endpoints::ANALYTICS, get(get_summary_endpoint))
        .route(
            endpoints::ANALYTICS_BY_CATEGORY,
            get(get_category_breakdown_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_index() -> Json<Value> {
    Json(json!({ "message": "cashflow API is running" }))
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;

    use crate::{AppState, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "Etc/UTC").expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn root_reports_api_is_running() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert!(response.json::<Value>()["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_returns_json_not_found() {
        let server = get_test_server();

        let response = server.get("/api/budgets").await;

        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"]["kind"], "not_found");
    }

    #[tokio::test]
    async fn all_operations_route_is_not_an_operation_id() {
        let server = get_test_server();

        let response = server.get(endpoints::ALL_OPERATIONS).await;

        // No operations yet, so the listing reports not found rather than a bad ID.
        response.assert_status_not_found();
        assert_eq!(response.json::<Value>()["error"]["kind"], "not_found");
    }
}
