//! Persistence seam.
//!
//! Services only see [`Store`]. `PgStore` backs production; `MemoryStore`
//! keeps everything behind one lock and is used when no database is
//! configured and by the test suite. Both implement the ledger operations
//! (`reserve_seats`, `cancel_booking`) as single all-or-nothing steps.

use async_trait::async_trait;
use uuid::Uuid;

use crate::approval::StatusChange;
use crate::error::AppResult;
use crate::models::booking::NewBooking;
use crate::models::movie::NewMovie;
use crate::models::review::NewReview;
use crate::models::show::{NewShow, ShowFilter};
use crate::models::theatre::NewTheatre;
use crate::models::user::{NewUser, ProfileChanges};
use crate::models::{
    AccountStatus, Booking, Movie, Review, Role, Show, Theatre, TheatreStatus, User,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of one conditional reserve attempt.
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    Reserved(Booking),
    ShowNotFound,
    /// The guarded decrement did not apply; nothing was written.
    InsufficientSeats { available: i32 },
    /// Labels already held by another confirmed booking of the same show.
    SeatsTaken(Vec<String>),
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    // users
    async fn insert_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn list_users(&self) -> AppResult<Vec<User>>;
    async fn list_users_with(&self, role: Role, status: AccountStatus) -> AppResult<Vec<User>>;
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<Option<User>>;
    async fn set_user_status(
        &self,
        id: Uuid,
        change: StatusChange<AccountStatus>,
    ) -> AppResult<Option<User>>;
    async fn delete_user(&self, id: Uuid) -> AppResult<bool>;

    // theatres
    async fn insert_theatre(&self, theatre: NewTheatre) -> AppResult<Theatre>;
    async fn find_theatre(&self, id: Uuid) -> AppResult<Option<Theatre>>;
    async fn list_theatres(&self) -> AppResult<Vec<Theatre>>;
    async fn list_theatres_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Theatre>>;
    async fn set_theatre_status(
        &self,
        id: Uuid,
        change: StatusChange<TheatreStatus>,
    ) -> AppResult<Option<Theatre>>;

    // movies
    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie>;
    async fn find_movie(&self, id: Uuid) -> AppResult<Option<Movie>>;
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    // shows
    async fn insert_show(&self, show: NewShow) -> AppResult<Show>;
    async fn find_show(&self, id: Uuid) -> AppResult<Option<Show>>;
    async fn list_shows(&self, filter: ShowFilter) -> AppResult<Vec<Show>>;
    /// Whether any theatre of `owner_id` has a show of `movie_id`.
    async fn owner_screens_movie(&self, owner_id: Uuid, movie_id: Uuid) -> AppResult<bool>;

    // ledger
    async fn reserve_seats(&self, booking: NewBooking) -> AppResult<ReserveOutcome>;
    async fn find_booking_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>>;
    /// Flips a confirmed booking to cancelled and restores its seats. `None`
    /// when no confirmed booking with that id belongs to the user.
    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>>;
    async fn list_bookings(&self) -> AppResult<Vec<Booking>>;
    async fn list_bookings_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>>;
    async fn list_bookings_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Booking>>;

    // reviews
    async fn find_review_by_author(&self, user_id: Uuid, movie_id: Uuid)
        -> AppResult<Option<Review>>;
    async fn insert_review(&self, review: NewReview) -> AppResult<Review>;
    async fn list_reviews_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>>;
    async fn delete_review(&self, id: Uuid) -> AppResult<bool>;
}
