use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::review::NewReview;
use crate::models::Review;
use crate::store::Store;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn Store>,
}

impl ReviewService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// One review per user per movie. The store enforces the same rule, so a
    /// concurrent duplicate also ends up as `Conflict`.
    pub async fn add_review(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
        rating: i32,
        comment: String,
    ) -> AppResult<Review> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(AppError::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        self.store
            .find_movie(movie_id)
            .await?
            .ok_or(AppError::NotFound("Movie"))?;

        if self
            .store
            .find_review_by_author(user_id, movie_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("You have already reviewed this movie"));
        }

        let review = self
            .store
            .insert_review(NewReview {
                user_id,
                movie_id,
                rating,
                comment: comment.trim().to_string(),
            })
            .await?;

        info!(review_id = %review.id, movie_id = %movie_id, "review added");
        Ok(review)
    }

    /// Reviews of a movie, visible to an owner only when one of their
    /// theatres shows it.
    pub async fn owner_reviews(&self, owner_id: Uuid, movie_id: Uuid) -> AppResult<Vec<Review>> {
        if !self.store.owner_screens_movie(owner_id, movie_id).await? {
            return Err(AppError::forbidden(
                "This movie is not shown at any of your theatres",
            ));
        }
        self.store.list_reviews_by_movie(movie_id).await
    }

    pub async fn movie_reviews(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        self.store.list_reviews_by_movie(movie_id).await
    }

    pub async fn delete_review(&self, review_id: Uuid) -> AppResult<()> {
        if !self.store.delete_review(review_id).await? {
            return Err(AppError::NotFound("Review"));
        }
        info!(review_id = %review_id, "review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie::NewMovie;
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    async fn service_with_movie() -> (ReviewService, Uuid) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let movie = store
            .insert_movie(NewMovie {
                title: "Up".into(),
                genre: vec!["animation".into()],
                duration: 96,
                description: "Balloons".into(),
                language: "English".into(),
                release_date: NaiveDate::from_ymd_opt(2009, 5, 29).unwrap(),
                rating: 8.0,
                trailer_url: None,
                poster: None,
            })
            .await
            .unwrap();
        (ReviewService::new(store), movie.id)
    }

    #[tokio::test]
    async fn second_review_by_same_user_conflicts() {
        let (reviews, movie_id) = service_with_movie().await;
        let user = Uuid::new_v4();

        reviews.add_review(user, movie_id, 5, "Lovely".into()).await.unwrap();
        assert!(matches!(
            reviews.add_review(user, movie_id, 4, "Again".into()).await,
            Err(AppError::Conflict(_))
        ));
        reviews
            .add_review(Uuid::new_v4(), movie_id, 3, "Fine".into())
            .await
            .unwrap();
        assert_eq!(reviews.movie_reviews(movie_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rating_outside_range_is_rejected() {
        let (reviews, movie_id) = service_with_movie().await;
        for rating in [0, 6] {
            assert!(matches!(
                reviews.add_review(Uuid::new_v4(), movie_id, rating, "x".into()).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn owner_without_show_is_forbidden() {
        let (reviews, movie_id) = service_with_movie().await;
        assert!(matches!(
            reviews.owner_reviews(Uuid::new_v4(), movie_id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            reviews.delete_review(Uuid::new_v4()).await,
            Err(AppError::NotFound("Review"))
        ));
    }
}
