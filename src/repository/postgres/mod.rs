use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    domain::rating::{NewRestaurantRating, RestaurantRating},
    repository::errors::RepositoryError,
    usecase::contracts::RatingRepository,
};

pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RatingRepository for PostgresRatingRepository {
    #[tracing::instrument(skip(self), fields(owner_id = %owner_id))]
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<RestaurantRating>, RepositoryError> {
        tracing::debug!("finding ratings by owner_id");

        let ratings = sqlx::query_as::<_, RestaurantRating>(
            r#"
            SELECT id, owner_id, restaurant_name, restaurant_type, rating
            FROM restaurant_ratings
            WHERE owner_id = $1
            ORDER BY id
            "#
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(owner_id = %owner_id, count = ratings.len(), "found ratings");
        Ok(ratings)
    }

    #[tracing::instrument(skip(self), fields(rating_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<RestaurantRating>, RepositoryError> {
        tracing::debug!("finding rating by id");

        let rating = sqlx::query_as::<_, RestaurantRating>(
            r#"
            SELECT id, owner_id, restaurant_name, restaurant_type, rating
            FROM restaurant_ratings
            WHERE id = $1
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(rating)
    }

    #[tracing::instrument(skip(self, rating), fields(owner_id = %rating.owner_id))]
    async fn insert(&self, rating: &NewRestaurantRating) -> Result<RestaurantRating, RepositoryError> {
        tracing::debug!("inserting rating");

        let created = sqlx::query_as::<_, RestaurantRating>(
            r#"
            INSERT INTO restaurant_ratings (owner_id, restaurant_name, restaurant_type, rating)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_id, restaurant_name, restaurant_type, rating
            "#
        )
        .bind(&rating.owner_id)
        .bind(&rating.restaurant_name)
        .bind(&rating.restaurant_type)
        .bind(rating.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(rating_id = created.id, "rating inserted successfully");
        Ok(created)
    }

    #[tracing::instrument(skip(self, rating), fields(rating_id = rating.id))]
    async fn update(&self, rating: &RestaurantRating) -> Result<RestaurantRating, RepositoryError> {
        tracing::debug!("updating rating");

        // owner_id and id are never written here
        let updated = sqlx::query_as::<_, RestaurantRating>(
            r#"
            UPDATE restaurant_ratings
            SET restaurant_name = $2, restaurant_type = $3, rating = $4
            WHERE id = $1
            RETURNING id, owner_id, restaurant_name, restaurant_type, rating
            "#
        )
        .bind(rating.id)
        .bind(&rating.restaurant_name)
        .bind(&rating.restaurant_type)
        .bind(rating.rating)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        tracing::debug!(rating_id = updated.id, "rating updated successfully");
        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(rating_id = id))]
    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError> {
        tracing::debug!("deleting rating");

        let result = sqlx::query(
            r#"
            DELETE FROM restaurant_ratings
            WHERE id = $1
            "#
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(rating_id = id, "rating deleted successfully");
        Ok(())
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
