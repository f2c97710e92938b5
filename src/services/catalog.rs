//! Movies, theatre listings and show scheduling.

use chrono::{DateTime, NaiveDate, Utc};
use futures::try_join;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{authorize, Action};
use crate::cache::CacheService;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::movie::NewMovie;
use crate::models::show::{NewShow, ShowFilter};
use crate::models::{Movie, Show, Theatre};
use crate::seat_map::{TheatreView, DEFAULT_SHOW_CAPACITY};
use crate::store::Store;
use crate::uploads::PosterStore;

/// A poster file taken from a multipart body.
#[derive(Debug, Clone)]
pub struct PosterUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields of the add-movie form, collected one field at a time.
///
/// Keys are accepted in camelCase and snake_case. `genre` may be sent as a
/// comma separated list or as repeated fields.
#[derive(Debug, Clone, Default)]
pub struct MovieForm {
    title: Option<String>,
    genre: Vec<String>,
    duration: Option<String>,
    description: Option<String>,
    language: Option<String>,
    release_date: Option<String>,
    rating: Option<String>,
    trailer_url: Option<String>,
    poster_url: Option<String>,
}

impl MovieForm {
    /// Records one text field. Unknown keys are ignored.
    pub fn set(&mut self, key: &str, value: String) {
        let value = value.trim().to_string();
        if value.is_empty() {
            return;
        }
        match key {
            "title" => self.title = Some(value),
            "genre" | "genre[]" => self.genre.extend(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string),
            ),
            "duration" => self.duration = Some(value),
            "description" => self.description = Some(value),
            "language" => self.language = Some(value),
            "releaseDate" | "release_date" => self.release_date = Some(value),
            "rating" => self.rating = Some(value),
            "trailerUrl" | "trailer_url" => self.trailer_url = Some(value),
            "poster" => self.poster_url = Some(value),
            other => debug!(field = other, "ignoring unknown movie form field"),
        }
    }

    pub fn into_new_movie(self, poster: Option<String>) -> AppResult<NewMovie> {
        let duration: i32 = required(self.duration, "duration")?
            .parse()
            .map_err(|_| AppError::validation("duration must be a whole number of minutes"))?;
        if duration <= 0 {
            return Err(AppError::validation("duration must be positive"));
        }

        let release_date = NaiveDate::parse_from_str(
            &required(self.release_date, "releaseDate")?,
            "%Y-%m-%d",
        )
        .map_err(|_| AppError::validation("releaseDate must be formatted as YYYY-MM-DD"))?;

        let rating = match self.rating {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|r| (0.0..=10.0).contains(r))
                .ok_or_else(|| AppError::validation("rating must be a number between 0 and 10"))?,
            None => 0.0,
        };

        Ok(NewMovie {
            title: required(self.title, "title")?,
            genre: self.genre,
            duration,
            description: required(self.description, "description")?,
            language: required(self.language, "language")?,
            release_date,
            rating,
            trailer_url: self.trailer_url,
            poster: poster.or(self.poster_url),
        })
    }
}

fn required(value: Option<String>, field: &str) -> AppResult<String> {
    value.ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

#[derive(Debug, Clone)]
pub struct ShowRequest {
    pub theatre_id: Uuid,
    pub movie_id: Uuid,
    pub screen_number: i32,
    pub show_time: DateTime<Utc>,
    pub total_seats: Option<i32>,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
    cache: CacheService,
    posters: PosterStore,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, cache: CacheService, posters: PosterStore) -> Self {
        Self {
            store,
            cache,
            posters,
        }
    }

    pub async fn add_movie(
        &self,
        form: MovieForm,
        poster: Option<PosterUpload>,
    ) -> AppResult<Movie> {
        let poster_path = match poster {
            Some(upload) => Some(self.posters.save(&upload.file_name, &upload.bytes).await?),
            None => None,
        };
        let movie = self.store.insert_movie(form.into_new_movie(poster_path)?).await?;
        self.cache.invalidate_movies().await;

        info!(movie_id = %movie.id, title = %movie.title, "movie added");
        Ok(movie)
    }

    pub async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        if let Some(movies) = self.cache.movies().await {
            return Ok(movies);
        }
        let movies = self.store.list_movies().await?;
        self.cache.store_movies(&movies).await;
        Ok(movies)
    }

    pub async fn list_theatres(&self) -> AppResult<Vec<TheatreView>> {
        let theatres = match self.cache.theatres().await {
            Some(theatres) => theatres,
            None => {
                let theatres = self.store.list_theatres().await?;
                self.cache.store_theatres(&theatres).await;
                theatres
            }
        };
        Ok(theatres.into_iter().map(TheatreView::from).collect())
    }

    pub async fn my_theatres(&self, owner_id: Uuid) -> AppResult<Vec<TheatreView>> {
        let theatres = self.store.list_theatres_by_owner(owner_id).await?;
        Ok(theatres.into_iter().map(TheatreView::from).collect())
    }

    pub async fn create_show(&self, owner: &AuthUser, request: ShowRequest) -> AppResult<Show> {
        let (theatre, movie) = try_join!(
            self.store.find_theatre(request.theatre_id),
            self.store.find_movie(request.movie_id)
        )?;
        let theatre: Theatre = theatre.ok_or(AppError::NotFound("Theatre"))?;

        authorize(owner, Action::CreateShow { theatre: &theatre })?;

        let movie = movie.ok_or(AppError::NotFound("Movie"))?;

        if !theatre.has_screen(request.screen_number) {
            return Err(AppError::validation(format!(
                "Screen number must be between 1 and {}",
                theatre.total_screens
            )));
        }

        let total_seats = request.total_seats.unwrap_or(DEFAULT_SHOW_CAPACITY);
        if total_seats <= 0 {
            return Err(AppError::validation("Total seats must be positive"));
        }

        let show = self
            .store
            .insert_show(NewShow {
                theatre_id: theatre.id,
                movie_id: movie.id,
                screen_number: request.screen_number,
                show_time: request.show_time,
                total_seats,
            })
            .await?;

        info!(show_id = %show.id, theatre_id = %theatre.id, movie_id = %movie.id, "show scheduled");
        Ok(show)
    }

    pub async fn list_shows(&self, filter: ShowFilter) -> AppResult<Vec<Show>> {
        self.store.list_shows(filter).await
    }

    pub async fn get_show(&self, show_id: Uuid) -> AppResult<Show> {
        self.store
            .find_show(show_id)
            .await?
            .ok_or(AppError::NotFound("Show"))
    }
}
