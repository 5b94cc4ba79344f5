use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;

use crate::delivery::http::v1::middleware::AuthenticatedUser;
use crate::domain::rating::{RatingChanges, RestaurantRating};
use crate::usecase::error::UsecaseError;
use crate::usecase::ratings::UpsertOutcome;
use crate::AppState;

/// Body of `POST /ratings`. `ownerID` is accepted for shape compatibility and ignored.
/// Missing fields bind to their zero values.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRatingRequest {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default, rename = "ownerID")]
    #[allow(dead_code)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub restaurant_name: String,
    #[serde(default)]
    pub restaurant_type: String,
    #[serde(default)]
    pub rating: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRatingRequest {
    #[serde(default)]
    pub restaurant_name: String,
    #[serde(default)]
    pub restaurant_type: String,
    #[serde(default)]
    pub rating: i32,
}

impl UpsertRatingRequest {
    fn changes(&self) -> RatingChanges {
        RatingChanges {
            restaurant_name: self.restaurant_name.clone(),
            restaurant_type: self.restaurant_type.clone(),
            rating: self.rating,
        }
    }
}

impl From<UpdateRatingRequest> for RatingChanges {
    fn from(r: UpdateRatingRequest) -> Self {
        RatingChanges {
            restaurant_name: r.restaurant_name,
            restaurant_type: r.restaurant_type,
            rating: r.rating,
        }
    }
}

fn count_denied(error: UsecaseError) -> UsecaseError {
    if matches!(error, UsecaseError::Unauthorized(_)) {
        metrics::counter!("ratings_access_denied_total").increment(1);
    }
    error
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!("handling list ratings request");

    let ratings = state.ratings_usecase.list_ratings(&user.user_id).await?;

    tracing::debug!(user_id = %user.user_id, count = ratings.len(), "ratings listed successfully");
    Ok((StatusCode::OK, Json(ratings)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<i32>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%rating_id, "handling get rating request");

    let rating = state
        .ratings_usecase
        .get_rating(&user.user_id, rating_id)
        .await
        .map_err(count_denied)?;

    tracing::debug!(%rating_id, "rating retrieved successfully");
    Ok((StatusCode::OK, Json(rating)))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, email = %user.email))]
pub async fn upsert_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<UpsertRatingRequest>,
) -> Result<Response, UsecaseError> {
    tracing::debug!(rating_id = ?payload.id, "handling upsert rating request");

    let (rating, outcome) = state
        .ratings_usecase
        .upsert_rating(&user.user_id, payload.id, payload.changes())
        .await
        .map_err(count_denied)?;

    match outcome {
        UpsertOutcome::Created => metrics::counter!("ratings_created_total").increment(1),
        UpsertOutcome::Updated => metrics::counter!("ratings_updated_total").increment(1),
    }
    tracing::debug!(rating_id = rating.id, ?outcome, "rating upserted successfully");

    Ok(upsert_response(rating, outcome))
}

#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id))]
pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<i32>,
    Json(payload): Json<UpdateRatingRequest>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%rating_id, "handling update rating request");

    let rating = state
        .ratings_usecase
        .update_rating(&user.user_id, rating_id, payload.into())
        .await
        .map_err(count_denied)?;

    metrics::counter!("ratings_updated_total").increment(1);
    tracing::debug!(%rating_id, "rating updated successfully");
    Ok((StatusCode::OK, Json(rating)))
}

#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(rating_id): Path<i32>,
) -> Result<impl IntoResponse, UsecaseError> {
    tracing::debug!(%rating_id, "handling delete rating request");

    state
        .ratings_usecase
        .delete_rating(&user.user_id, rating_id)
        .await
        .map_err(count_denied)?;

    metrics::counter!("ratings_deleted_total").increment(1);
    tracing::debug!(%rating_id, "rating deleted successfully");
    Ok(StatusCode::OK)
}

/// 201 with a `Location` header for a new rating, 200 for an updated one.
fn upsert_response(rating: RestaurantRating, outcome: UpsertOutcome) -> Response {
    match outcome {
        UpsertOutcome::Created => {
            let location = format!("/api/v1/ratings/{}", rating.id);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(rating),
            )
                .into_response()
        }
        UpsertOutcome::Updated => (StatusCode::OK, Json(rating)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn test_upsert_request_without_id() {
        let payload: UpsertRatingRequest = serde_json::from_value(serde_json::json!({
            "restaurantName": "Cafe A",
            "restaurantType": "cafe",
            "rating": 4
        }))
        .unwrap();

        assert_eq!(payload.id, None);
        assert_eq!(payload.owner_id, None);
        assert_eq!(
            payload.changes(),
            RatingChanges {
                restaurant_name: "Cafe A".to_string(),
                restaurant_type: "cafe".to_string(),
                rating: 4,
            }
        );
    }

    #[test]
    fn test_upsert_request_owner_is_not_part_of_changes() {
        let payload: UpsertRatingRequest = serde_json::from_value(serde_json::json!({
            "id": 1,
            "ownerID": "someone-else",
            "restaurantName": "Cafe A2",
            "restaurantType": "cafe",
            "rating": 5
        }))
        .unwrap();

        assert_eq!(payload.id, Some(1));
        assert_eq!(payload.owner_id.as_deref(), Some("someone-else"));
        assert_eq!(payload.changes().restaurant_name, "Cafe A2");
    }

    #[test]
    fn test_missing_fields_bind_to_zero_values() {
        let payload: UpsertRatingRequest = serde_json::from_value(serde_json::json!({
            "restaurantName": "Cafe A"
        }))
        .unwrap();

        assert_eq!(payload.id, None);
        assert_eq!(payload.restaurant_type, "");
        assert_eq!(payload.rating, 0);

        let payload: UpdateRatingRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(
            RatingChanges::from(payload),
            RatingChanges {
                restaurant_name: String::new(),
                restaurant_type: String::new(),
                rating: 0,
            }
        );
    }

    #[test]
    fn test_long_names_and_any_rating_are_accepted() {
        let payload: UpsertRatingRequest = serde_json::from_value(serde_json::json!({
            "restaurantName": "x".repeat(1000),
            "restaurantType": "y".repeat(300),
            "rating": -20
        }))
        .unwrap();

        let changes = payload.changes();
        assert_eq!(changes.restaurant_name.len(), 1000);
        assert_eq!(changes.restaurant_type.len(), 300);
        assert_eq!(changes.rating, -20);
    }

    fn sample_rating() -> RestaurantRating {
        RestaurantRating {
            id: 12,
            owner_id: "u1".to_string(),
            restaurant_name: "Cafe A".to_string(),
            restaurant_type: "cafe".to_string(),
            rating: 4,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_created_response_has_location() {
        let response = upsert_response(sample_rating(), UpsertOutcome::Created);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/api/v1/ratings/12"
        );
        assert_eq!(body_json(response).await["ownerID"], "u1");
    }

    #[tokio::test]
    async fn test_updated_response_is_ok_without_location() {
        let response = upsert_response(sample_rating(), UpsertOutcome::Updated);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "id": 12,
                "ownerID": "u1",
                "restaurantName": "Cafe A",
                "restaurantType": "cafe",
                "rating": 4
            })
        );
    }

    #[test]
    fn test_denied_and_missing_records_map_to_401_and_404() {
        let denied = UsecaseError::Unauthorized("Access denied".to_string()).into_response();
        let missing = UsecaseError::NotFound("Rating".to_string()).into_response();

        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
