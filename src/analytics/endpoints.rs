//! Route handlers for period totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    analytics::{CategoryTotal, Totals},
    db::with_transaction,
    period::{PeriodQuery, TypeQuery},
    queries::{category_breakdown, summary},
    timezone::get_local_date,
};

/// The state needed for the analytics endpoints.
#[derive(Debug, Clone)]
pub struct AnalyticsState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub local_timezone: String,
}

impl FromRef<AppState> for AnalyticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Responds with the income, expense and cashflow totals for the requested period.
pub async fn get_summary_endpoint(
    State(state): State<AnalyticsState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Result<Json<Totals>, Error> {
    let Query(query) = query?;
    let today = get_local_date(&state.local_timezone);

    with_transaction(&state.db_connection, |connection| {
        summary(query.period, today, connection)
    })
    .map(Json)
}

/// Responds with per-category totals of one category type.
pub async fn get_category_breakdown_endpoint(
    State(state): State<AnalyticsState>,
    query: Result<Query<TypeQuery>, QueryRejection>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let Query(query) = query?;
    let today = get_local_date(&state.local_timezone);

    with_transaction(&state.db_connection, |connection| {
        category_breakdown(query.category_type, query.period, today, connection)
    })
    .map(Json)
}
