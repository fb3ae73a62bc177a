use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{PublicUser, SignInQuery, SignUpBody, UpdateUserBody, UserProfile},
        password,
        repo::RepoError,
        validation,
    },
};

const CREATE_FAILED: &str = "Error creating user";
const FIND_FAILED: &str = "Error finding user";
const UPDATE_FAILED: &str = "Error updating user";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user", post(sign_up).get(sign_in))
        .route("/user/:id", patch(update_user))
}

fn invalid(errors: Vec<String>) -> ApiError {
    warn!(?errors, "request validation failed");
    ApiError::Validation(errors)
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpBody>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(body) = payload.map_err(|e| invalid(vec![e.body_text()]))?;
    let new_user = validation::sign_up(body).map_err(invalid)?;

    // Fast path; the unique constraint below still catches concurrent sign-ups.
    match state.users.find_by_email(&new_user.email).await {
        Ok(None) => {}
        Ok(Some(_)) => {
            warn!(email = %new_user.email, "email already registered");
            return Err(ApiError::Conflict);
        }
        Err(e) => return Err(ApiError::internal(CREATE_FAILED, e)),
    }

    let hash = password::hash(new_user.password)
        .await
        .map_err(|e| ApiError::internal(CREATE_FAILED, e))?;

    let user = match state
        .users
        .create(&new_user.name, &new_user.email, &hash)
        .await
    {
        Ok(u) => u,
        Err(RepoError::Conflict) => {
            warn!(email = %new_user.email, "email registered concurrently");
            return Err(ApiError::Conflict);
        }
        Err(e) => return Err(ApiError::internal(CREATE_FAILED, e)),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}

#[instrument(skip(state, query))]
pub async fn sign_in(
    State(state): State<AppState>,
    query: Result<Query<SignInQuery>, QueryRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let Query(query) = query.map_err(|e| invalid(vec![e.body_text()]))?;
    let credentials = validation::sign_in(query).map_err(invalid)?;

    let user = match state.users.find_by_email(&credentials.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %credentials.email, "sign-in unknown email");
            return Err(ApiError::NotFound);
        }
        Err(e) => return Err(ApiError::internal(FIND_FAILED, e)),
    };

    let ok = password::verify(credentials.password, user.password_hash.clone())
        .await
        .map_err(|e| ApiError::internal(FIND_FAILED, e))?;

    if !ok {
        warn!(user_id = %user.id, "sign-in invalid password");
        return Err(ApiError::Unauthorized);
    }

    info!(user_id = %user.id, "user signed in");
    Ok(Json(PublicUser::from(user)))
}

/// The body is validated before the path. A well-formed id with no matching
/// row is reported as an internal error, not a 404.
#[instrument(skip(state, path, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserBody>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(body) = payload.map_err(|e| invalid(vec![e.body_text()]))?;
    let update = validation::update_body(body).map_err(invalid)?;

    let Path(raw_id) = path.map_err(|e| invalid(vec![e.body_text()]))?;
    let id = validation::user_id(&raw_id).map_err(invalid)?;

    let user = state
        .users
        .update(id, &update.name, update.image.as_deref())
        .await
        .map_err(|e| ApiError::internal(UPDATE_FAILED, e))?;

    info!(user_id = %user.id, "user updated");
    Ok(Json(UserProfile::from(user)))
}
