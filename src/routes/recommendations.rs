use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{EnrichedGame, UserProfile},
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct UserRecommendationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileRecommendationRequest {
    #[serde(default)]
    pub terms: Vec<String>,
}

/// Recommends games for a stored user
pub async fn recommend_for_user(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<UserRecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<EnrichedGame>>> {
    let Json(request) = payload?;
    let user_id = request
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;

    tracing::info!(request_id = %request_id, user_id = %user_id, "Processing recommendation request");

    let profile = state
        .profiles
        .fetch_profile(user_id)
        .await?
        .filter(|profile| !profile.is_empty())
        .ok_or_else(|| AppError::NotFound("No user history found".to_string()))?;

    let games = state.recommender.recommend(&profile).await?;

    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        results = games.len(),
        "Recommendation completed"
    );

    Ok(Json(games))
}

/// Recommends games for interests supplied directly by the caller
pub async fn recommend_for_profile(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<ProfileRecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<EnrichedGame>>> {
    let Json(request) = payload?;
    let profile = UserProfile::new(request.terms);

    tracing::info!(request_id = %request_id, terms = profile.len(), "Processing profile recommendation");

    if profile.is_empty() {
        return Err(AppError::NotFound("No user history found".to_string()));
    }

    let games = state.recommender.recommend(&profile).await?;
    Ok(Json(games))
}
