//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI document.

use crate::web::{
    dto::{
        ErrorResponse, InterestFieldDetails, InterestFieldsRequest, InterestResponse,
        MessageResponse, SwapFieldsRequest, SwapResponse,
    },
    error::HttpError,
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use skill_swap_core::{NewInterest, PortError};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        list_swaps_handler,
        create_swap_handler,
        get_swap_handler,
        update_swap_handler,
        delete_swap_handler,
        add_interested_user_handler,
        update_interested_user_handler,
        delete_interested_user_handler,
        update_interest_by_id_handler,
        delete_interest_by_id_handler,
    ),
    components(
        schemas(
            SwapResponse,
            InterestResponse,
            SwapFieldsRequest,
            InterestFieldsRequest,
            MessageResponse,
            ErrorResponse,
            InterestFieldDetails,
        )
    ),
    tags(
        (name = "Skill Swap API", description = "Post skill swaps and register interest in them.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Path Helpers
//=========================================================================================

// An identifier that is not a UUID cannot name any stored swap.
fn parse_swap_id(raw: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(raw).map_err(|_| HttpError::swap_not_found())
}

fn parse_interest_id(raw: &str) -> Result<Uuid, HttpError> {
    Uuid::parse_str(raw).map_err(|_| HttpError::interest_not_found())
}

/// Parses a position, reporting a missing swap before a malformed index.
async fn parse_index(app_state: &AppState, id: Uuid, raw: &str) -> Result<usize, HttpError> {
    match raw.parse::<usize>() {
        Ok(index) => Ok(index),
        Err(_) => {
            app_state.board.get_swap(id).await?;
            Err(HttpError::invalid_index())
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Server is up", body = MessageResponse))
)]
pub async fn health_handler() -> Json<MessageResponse> {
    Json(MessageResponse::new("Server is working!"))
}

/// List every swap, most recently posted first.
#[utoipa::path(
    get,
    path = "/api/swaps",
    responses(
        (status = 200, description = "All skill swaps", body = [SwapResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_swaps_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<SwapResponse>>, HttpError> {
    let swaps = app_state.board.list_swaps().await?;
    Ok(Json(swaps.into_iter().map(SwapResponse::from).collect()))
}

/// Post a new swap.
#[utoipa::path(
    post,
    path = "/api/swaps",
    request_body = SwapFieldsRequest,
    responses(
        (status = 201, description = "Skill swap created", body = SwapResponse),
        (status = 400, description = "Malformed body or missing required field", body = ErrorResponse)
    )
)]
pub async fn create_swap_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<SwapFieldsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    let Json(req) = payload?;
    let swap = app_state.board.create_swap(req.into()).await?;
    Ok((StatusCode::CREATED, Json(SwapResponse::from(swap))))
}

/// Fetch a single swap.
#[utoipa::path(
    get,
    path = "/api/swaps/{id}",
    params(("id" = String, Path, description = "Skill swap identifier")),
    responses(
        (status = 200, description = "The skill swap", body = SwapResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse)
    )
)]
pub async fn get_swap_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let swap = app_state.board.get_swap(id).await?;
    Ok(Json(swap.into()))
}

/// Edit a swap. Absent fields are left unchanged; `notes` may be cleared with `""`.
#[utoipa::path(
    put,
    path = "/api/swaps/{id}",
    params(("id" = String, Path, description = "Skill swap identifier")),
    request_body = SwapFieldsRequest,
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse),
        (status = 409, description = "Concurrent modification", body = ErrorResponse)
    )
)]
pub async fn update_swap_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SwapFieldsRequest>, JsonRejection>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let Json(req) = payload?;
    let swap = app_state.board.update_swap(id, req.into()).await?;
    Ok(Json(swap.into()))
}

/// Delete a swap together with its interested users.
#[utoipa::path(
    delete,
    path = "/api/swaps/{id}",
    params(("id" = String, Path, description = "Skill swap identifier")),
    responses(
        (status = 200, description = "Skill swap deleted", body = MessageResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse)
    )
)]
pub async fn delete_swap_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    app_state.board.delete_swap(id).await?;
    Ok(Json(MessageResponse::new("Skill swap deleted successfully")))
}

/// Express interest in a swap. All four fields are required.
#[utoipa::path(
    post,
    path = "/api/swaps/{id}/interested",
    params(("id" = String, Path, description = "Skill swap identifier")),
    request_body = InterestFieldsRequest,
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 400, description = "Missing required fields, itemized in `details`", body = ErrorResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse)
    )
)]
pub async fn add_interested_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<InterestFieldsRequest>, JsonRejection>,
) -> Result<Json<SwapResponse>, HttpError> {
    let Json(req) = payload?;
    let fields = NewInterest::from(req);
    let Ok(id) = Uuid::parse_str(&id) else {
        // Validation is reported ahead of the unknown swap, as for stored ids.
        fields.validate().map_err(PortError::from)?;
        return Err(HttpError::swap_not_found());
    };
    let swap = app_state.board.append_interest(id, fields).await?;
    Ok(Json(swap.into()))
}

/// Edit the interested user currently at `index`.
#[utoipa::path(
    put,
    path = "/api/swaps/{id}/interested/{index}",
    params(
        ("id" = String, Path, description = "Skill swap identifier"),
        ("index" = usize, Path, description = "Current position in the interested users list")
    ),
    request_body = InterestFieldsRequest,
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 400, description = "Invalid user index", body = ErrorResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse)
    )
)]
pub async fn update_interested_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, String)>,
    payload: Result<Json<InterestFieldsRequest>, JsonRejection>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let index = parse_index(&app_state, id, &index).await?;
    let Json(req) = payload?;
    let swap = app_state
        .board
        .update_interest_at(id, index, req.into())
        .await?;
    Ok(Json(swap.into()))
}

/// Remove the interested user currently at `index`; later entries shift down.
#[utoipa::path(
    delete,
    path = "/api/swaps/{id}/interested/{index}",
    params(
        ("id" = String, Path, description = "Skill swap identifier"),
        ("index" = usize, Path, description = "Current position in the interested users list")
    ),
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 400, description = "Invalid user index", body = ErrorResponse),
        (status = 404, description = "Skill swap not found", body = ErrorResponse)
    )
)]
pub async fn delete_interested_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, String)>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let index = parse_index(&app_state, id, &index).await?;
    let swap = app_state.board.delete_interest_at(id, index).await?;
    Ok(Json(swap.into()))
}

/// Edit an interested user by its stable identifier.
#[utoipa::path(
    put,
    path = "/api/swaps/{id}/interests/{interest_id}",
    params(
        ("id" = String, Path, description = "Skill swap identifier"),
        ("interest_id" = Uuid, Path, description = "Interested user identifier")
    ),
    request_body = InterestFieldsRequest,
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 404, description = "Skill swap or interested user not found", body = ErrorResponse)
    )
)]
pub async fn update_interest_by_id_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, interest_id)): Path<(String, String)>,
    payload: Result<Json<InterestFieldsRequest>, JsonRejection>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let interest_id = parse_interest_id(&interest_id)?;
    let Json(req) = payload?;
    let swap = app_state
        .board
        .update_interest(id, interest_id, req.into())
        .await?;
    Ok(Json(swap.into()))
}

/// Remove an interested user by its stable identifier.
#[utoipa::path(
    delete,
    path = "/api/swaps/{id}/interests/{interest_id}",
    params(
        ("id" = String, Path, description = "Skill swap identifier"),
        ("interest_id" = Uuid, Path, description = "Interested user identifier")
    ),
    responses(
        (status = 200, description = "Updated skill swap", body = SwapResponse),
        (status = 404, description = "Skill swap or interested user not found", body = ErrorResponse)
    )
)]
pub async fn delete_interest_by_id_handler(
    State(app_state): State<Arc<AppState>>,
    Path((id, interest_id)): Path<(String, String)>,
) -> Result<Json<SwapResponse>, HttpError> {
    let id = parse_swap_id(&id)?;
    let interest_id = parse_interest_id(&interest_id)?;
    let swap = app_state.board.delete_interest(id, interest_id).await?;
    Ok(Json(swap.into()))
}
