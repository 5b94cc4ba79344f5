use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRating {
    pub id: i32,
    #[serde(rename = "ownerID")]
    pub owner_id: String,
    pub restaurant_name: String,
    pub restaurant_type: String,
    pub rating: i32,
}

/// A rating that has not been persisted yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRestaurantRating {
    pub owner_id: String,
    pub restaurant_name: String,
    pub restaurant_type: String,
    pub rating: i32,
}

impl NewRestaurantRating {
    pub fn new(owner_id: &str, changes: RatingChanges) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            restaurant_name: changes.restaurant_name,
            restaurant_type: changes.restaurant_type,
            rating: changes.rating,
        }
    }
}

/// The fields a caller is allowed to set on a rating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingChanges {
    pub restaurant_name: String,
    pub restaurant_type: String,
    pub rating: i32,
}

impl RestaurantRating {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    /// Copies the mutable fields onto this rating. `id` and `owner_id` are never touched.
    pub fn apply(&mut self, changes: RatingChanges) {
        self.restaurant_name = changes.restaurant_name;
        self.restaurant_type = changes.restaurant_type;
        self.rating = changes.rating;
    }
}
