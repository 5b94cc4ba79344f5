use serde::Deserialize;

use crate::domain::rating::{NewRestaurantRating, RatingChanges, RestaurantRating};
use crate::usecase::contracts::RatingRepository;
use crate::usecase::error::UsecaseError;

const ACCESS_DENIED: &str = "Access denied";

/// Who may delete a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Only the owner may delete; unknown ids are reported as not found.
    #[default]
    OwnerOnly,
    /// Any authenticated caller may delete any rating by id.
    Unchecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

pub struct RatingsUseCase<R>
where
    R: RatingRepository,
{
    rating_repository: R,
    delete_policy: DeletePolicy,
}

impl<R> RatingsUseCase<R>
where
    R: RatingRepository,
{
    pub fn new(rating_repository: R, delete_policy: DeletePolicy) -> Self {
        Self {
            rating_repository,
            delete_policy,
        }
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_ratings(&self, user_id: &str) -> Result<Vec<RestaurantRating>, UsecaseError> {
        tracing::debug!("listing user ratings");

        let ratings = self.rating_repository.find_by_owner(user_id).await?;

        tracing::debug!(%user_id, count = ratings.len(), "retrieved user ratings");
        Ok(ratings)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, rating_id = rating_id))]
    pub async fn get_rating(&self, user_id: &str, rating_id: i32) -> Result<RestaurantRating, UsecaseError> {
        tracing::debug!("getting rating");

        self.find_owned(user_id, rating_id).await
    }

    /// Creates a rating when `rating_id` is absent or not positive, otherwise updates it.
    #[tracing::instrument(skip(self, changes), fields(user_id = %user_id, rating_id = ?rating_id))]
    pub async fn upsert_rating(
        &self,
        user_id: &str,
        rating_id: Option<i32>,
        changes: RatingChanges,
    ) -> Result<(RestaurantRating, UpsertOutcome), UsecaseError> {
        match rating_id.filter(|id| *id > 0) {
            Some(id) => {
                let rating = self.update_rating(user_id, id, changes).await?;
                Ok((rating, UpsertOutcome::Updated))
            }
            None => {
                let rating = self.create_rating(user_id, changes).await?;
                Ok((rating, UpsertOutcome::Created))
            }
        }
    }

    #[tracing::instrument(skip(self, changes), fields(user_id = %user_id))]
    pub async fn create_rating(
        &self,
        user_id: &str,
        changes: RatingChanges,
    ) -> Result<RestaurantRating, UsecaseError> {
        tracing::debug!("creating new rating");

        let new_rating = NewRestaurantRating::new(user_id, changes);
        let rating = self.rating_repository.insert(&new_rating).await?;

        tracing::info!(rating_id = rating.id, %user_id, "rating created successfully");
        Ok(rating)
    }

    #[tracing::instrument(skip(self, changes), fields(user_id = %user_id, rating_id = rating_id))]
    pub async fn update_rating(
        &self,
        user_id: &str,
        rating_id: i32,
        changes: RatingChanges,
    ) -> Result<RestaurantRating, UsecaseError> {
        tracing::debug!("updating rating");

        let mut rating = self.find_owned(user_id, rating_id).await?;
        rating.apply(changes);
        let rating = self.rating_repository.update(&rating).await?;

        tracing::info!(rating_id, %user_id, "rating updated successfully");
        Ok(rating)
    }

    #[tracing::instrument(skip(self), fields(user_id = %user_id, rating_id = rating_id, delete_policy = ?self.delete_policy))]
    pub async fn delete_rating(&self, user_id: &str, rating_id: i32) -> Result<(), UsecaseError> {
        tracing::debug!("deleting rating");

        if self.delete_policy == DeletePolicy::OwnerOnly {
            self.find_owned(user_id, rating_id).await?;
        }

        self.rating_repository.delete_by_id(rating_id).await?;

        tracing::info!(rating_id, %user_id, "rating deleted successfully");
        Ok(())
    }

    /// Existence is checked before ownership, so unknown ids are never reported as denied.
    async fn find_owned(&self, user_id: &str, rating_id: i32) -> Result<RestaurantRating, UsecaseError> {
        let rating = self
            .rating_repository
            .find_by_id(rating_id)
            .await?
            .ok_or_else(|| UsecaseError::NotFound("Rating".to_string()))?;

        if !rating.is_owned_by(user_id) {
            tracing::warn!(rating_id, %user_id, "rating access denied to non-owner");
            return Err(UsecaseError::Unauthorized(ACCESS_DENIED.to_string()));
        }

        Ok(rating)
    }
}
