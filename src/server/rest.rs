//! Generic REST handlers shared by every entity
//!
//! Each handler is generic over an [`EntityMapper`] and is mounted by the
//! entity's descriptor, e.g. `get(rest::get_one::<PizzaMapper>)`.

use crate::config::PaginationConfig;
use crate::core::entity::{Entity, Identified};
use crate::core::error::{EntityError, PizzeriaError, PizzeriaResult};
use crate::core::mapper::EntityMapper;
use crate::core::query::PageRequest;
use crate::core::service::CrudService;
use crate::core::validation::ValidJson;
use crate::server::headers::{HeaderUtil, pagination_headers};
use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

/// State shared by the generic handlers of one entity
pub struct RestState<M: EntityMapper> {
    pub service: CrudService<M>,
    pub headers: HeaderUtil,
    /// Base path without trailing slash, used for `Location`
    pub base_path: String,
    pub pagination: PaginationConfig,
}

impl<M: EntityMapper> Clone for RestState<M> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            headers: self.headers.clone(),
            base_path: self.base_path.clone(),
            pagination: self.pagination.clone(),
        }
    }
}

impl<M: EntityMapper> RestState<M> {
    pub fn new(
        service: CrudService<M>,
        headers: HeaderUtil,
        base_path: impl Into<String>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            service,
            headers,
            base_path: base_path.into(),
            pagination,
        }
    }

    fn location(&self, id: i64) -> String {
        format!("{}/{}/{}", self.base_path, M::Entity::resource_name(), id)
    }
}

fn entity_name<M: EntityMapper>() -> &'static str {
    M::Entity::resource_name_singular()
}

/// Reject a PUT or PATCH whose body id is absent, differs from the path id,
/// or names a record that does not exist
async fn check_target<M: EntityMapper>(
    state: &RestState<M>,
    path_id: i64,
    body_id: Option<i64>,
) -> PizzeriaResult<()> {
    let entity_type = entity_name::<M>().to_string();
    let Some(body_id) = body_id else {
        return Err(EntityError::IdNull { entity_type }.into());
    };
    if body_id != path_id {
        return Err(EntityError::IdInvalid {
            entity_type,
            path_id,
            body_id,
        }
        .into());
    }
    if !state.service.exists(path_id).await? {
        return Err(EntityError::IdNotFound {
            entity_type,
            id: path_id,
        }
        .into());
    }
    Ok(())
}

/// `POST /{plural}`: 201 with `Location` and the stored record
pub async fn create<M: EntityMapper>(
    State(state): State<RestState<M>>,
    ValidJson(dto): ValidJson<M::Dto>,
) -> PizzeriaResult<Response> {
    tracing::debug!("REST request to save {}", entity_name::<M>());
    let saved = state.service.save(dto).await?;
    let id = saved
        .id()
        .ok_or_else(|| PizzeriaError::Internal("store returned a record without id".into()))?;

    let mut headers = state.headers.entity_created(entity_name::<M>(), id);
    if let Ok(location) = HeaderValue::from_str(&state.location(id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// `PUT /{plural}/{id}`: replace every field
pub async fn update<M: EntityMapper>(
    State(state): State<RestState<M>>,
    Path(id): Path<i64>,
    ValidJson(dto): ValidJson<M::Dto>,
) -> PizzeriaResult<Response> {
    tracing::debug!("REST request to update {} : {}", entity_name::<M>(), id);
    check_target(&state, id, dto.id()).await?;

    let updated = state.service.update(dto).await?;
    let headers = state.headers.entity_updated(entity_name::<M>(), id);
    Ok((headers, Json(updated)).into_response())
}

/// `PATCH /{plural}/{id}`: merge the fields present in the body
pub async fn partial_update<M: EntityMapper>(
    State(state): State<RestState<M>>,
    Path(id): Path<i64>,
    ValidJson(patch): ValidJson<M::Patch>,
) -> PizzeriaResult<Response> {
    tracing::debug!(
        "REST request to partial update {} partially : {}",
        entity_name::<M>(),
        id
    );
    check_target(&state, id, patch.id()).await?;

    match state.service.partial_update(patch).await? {
        Some(updated) => {
            let headers = state.headers.entity_updated(entity_name::<M>(), id);
            Ok((headers, Json(updated)).into_response())
        }
        None => Err(EntityError::NotFound {
            entity_type: entity_name::<M>().to_string(),
            id,
        }
        .into()),
    }
}

/// `GET /{plural}/{id}`
pub async fn get_one<M: EntityMapper>(
    State(state): State<RestState<M>>,
    Path(id): Path<i64>,
) -> PizzeriaResult<Json<M::Dto>> {
    tracing::debug!("REST request to get {} : {}", entity_name::<M>(), id);
    state.service.find_one(id).await?.map(Json).ok_or_else(|| {
        EntityError::NotFound {
            entity_type: entity_name::<M>().to_string(),
            id,
        }
        .into()
    })
}

/// `DELETE /{plural}/{id}`: 204 whether or not the record existed
pub async fn delete<M: EntityMapper>(
    State(state): State<RestState<M>>,
    Path(id): Path<i64>,
) -> PizzeriaResult<(StatusCode, HeaderMap)> {
    tracing::debug!("REST request to delete {} : {}", entity_name::<M>(), id);
    state.service.delete(id).await?;
    Ok((
        StatusCode::NO_CONTENT,
        state.headers.entity_deleted(entity_name::<M>(), id),
    ))
}

/// `GET /{plural}`: one page, with `X-Total-Count` and `Link` headers
pub async fn list<M: EntityMapper>(
    State(state): State<RestState<M>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<Vec<(String, String)>>,
) -> PizzeriaResult<Response> {
    tracing::debug!("REST request to get a page of {}", M::Entity::resource_name());
    let request = PageRequest::from_query_pairs(&params, &state.pagination)?;
    let page = state.service.find_all(&request).await?;
    let headers = pagination_headers(&uri, &page);
    Ok((headers, Json(page.content)).into_response())
}
