use crate::cache::CacheService;
use crate::models::{Movie, Theatre};

const MOVIES_KEY: &str = "catalog:movies";
const THEATRES_KEY: &str = "catalog:theatres";

impl CacheService {
    pub async fn movies(&self) -> Option<Vec<Movie>> {
        self.get_json(MOVIES_KEY).await
    }

    pub async fn store_movies(&self, movies: &[Movie]) {
        self.put_json(MOVIES_KEY, movies).await
    }

    pub async fn invalidate_movies(&self) {
        self.invalidate(MOVIES_KEY).await
    }

    pub async fn theatres(&self) -> Option<Vec<Theatre>> {
        self.get_json(THEATRES_KEY).await
    }

    pub async fn store_theatres(&self, theatres: &[Theatre]) {
        self.put_json(THEATRES_KEY, theatres).await
    }

    /// Any theatre insert or status change makes the listing stale.
    pub async fn invalidate_theatres(&self) {
        self.invalidate(THEATRES_KEY).await
    }
}
