//! Topping HTTP handlers that take criteria
//!
//! The remaining CRUD routes use the generic handlers in
//! [`crate::server::rest`].

use super::{ToppingCriteria, ToppingMapper, ToppingQueryService};
use crate::core::error::PizzeriaResult;
use crate::core::query::PageRequest;
use crate::server::headers::pagination_headers;
use crate::server::rest::RestState;
use axum::{
    Json,
    extract::{FromRef, OriginalUri, Query, State},
    response::{IntoResponse, Response},
};

/// Topping-specific AppState
#[derive(Clone, FromRef)]
pub struct ToppingAppState {
    pub rest: RestState<ToppingMapper>,
    pub query: ToppingQueryService,
}

/// `GET /toppings?{criteria}&page=&size=&sort=`
pub async fn list_toppings(
    State(state): State<ToppingAppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<Vec<(String, String)>>,
) -> PizzeriaResult<Response> {
    let criteria = ToppingCriteria::from_query_pairs(&params)?;
    tracing::debug!("REST request to get Toppings by criteria: {:?}", criteria);
    let request = PageRequest::from_query_pairs(&params, &state.rest.pagination)?;

    let page = state.query.find_page_by_criteria(&criteria, &request).await?;
    let headers = pagination_headers(&uri, &page);
    Ok((headers, Json(page.content)).into_response())
}

/// `GET /toppings/count?{criteria}`
pub async fn count_toppings(
    State(state): State<ToppingAppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> PizzeriaResult<Json<u64>> {
    let criteria = ToppingCriteria::from_query_pairs(&params)?;
    tracing::debug!("REST request to count Toppings by criteria: {:?}", criteria);
    Ok(Json(state.query.count_by_criteria(&criteria).await?))
}
