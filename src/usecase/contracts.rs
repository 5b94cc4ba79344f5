use crate::{
    domain::rating::{NewRestaurantRating, RestaurantRating},
    repository::errors::RepositoryError,
};

#[cfg_attr(test, mockall::automock)]
pub trait RatingRepository: Send + Sync {
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<RestaurantRating>, RepositoryError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<RestaurantRating>, RepositoryError>;
    async fn insert(&self, rating: &NewRestaurantRating) -> Result<RestaurantRating, RepositoryError>;
    async fn update(&self, rating: &RestaurantRating) -> Result<RestaurantRating, RepositoryError>;
    async fn delete_by_id(&self, id: i32) -> Result<(), RepositoryError>;
}
