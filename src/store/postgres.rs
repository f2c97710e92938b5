use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ReserveOutcome, Store};
use crate::approval::StatusChange;
use crate::error::{conflict_on_unique, AppResult};
use crate::models::booking::NewBooking;
use crate::models::movie::NewMovie;
use crate::models::review::NewReview;
use crate::models::show::{NewShow, ShowFilter};
use crate::models::theatre::NewTheatre;
use crate::models::user::{NewUser, ProfileChanges};
use crate::models::{
    AccountStatus, Booking, Movie, Review, Role, Show, Theatre, TheatreStatus, User,
};

const EMAIL_TAKEN: &str = "Email is already registered";
const ALREADY_REVIEWED: &str = "You have already reviewed this movie";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /* ---------- USERS ---------- */

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let user = user.into_user();
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.status)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_users_with(&self, role: Role, status: AccountStatus) -> AppResult<Vec<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 AND status = $2 ORDER BY created_at DESC",
        )
        .bind(role)
        .bind(status)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, EMAIL_TAKEN))
    }

    async fn set_user_status(
        &self,
        id: Uuid,
        change: StatusChange<AccountStatus>,
    ) -> AppResult<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET status = $2, rejection_reason = $3, approved_by = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(change.status)
        .bind(change.rejection_reason)
        .bind(change.approved_by)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /* ---------- THEATRES ---------- */

    async fn insert_theatre(&self, theatre: NewTheatre) -> AppResult<Theatre> {
        let theatre = theatre.into_theatre();
        Ok(sqlx::query_as::<_, Theatre>(
            r#"
            INSERT INTO theatres (id, name, location, total_screens, owner_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(theatre.id)
        .bind(&theatre.name)
        .bind(&theatre.location)
        .bind(theatre.total_screens)
        .bind(theatre.owner_id)
        .bind(theatre.status)
        .bind(theatre.created_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_theatre(&self, id: Uuid) -> AppResult<Option<Theatre>> {
        Ok(sqlx::query_as::<_, Theatre>("SELECT * FROM theatres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_theatres(&self) -> AppResult<Vec<Theatre>> {
        Ok(sqlx::query_as::<_, Theatre>("SELECT * FROM theatres ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_theatres_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Theatre>> {
        Ok(sqlx::query_as::<_, Theatre>(
            "SELECT * FROM theatres WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn set_theatre_status(
        &self,
        id: Uuid,
        change: StatusChange<TheatreStatus>,
    ) -> AppResult<Option<Theatre>> {
        Ok(sqlx::query_as::<_, Theatre>(
            r#"
            UPDATE theatres
            SET status = $2, rejection_reason = $3, approved_by = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(change.status)
        .bind(change.rejection_reason)
        .bind(change.approved_by)
        .fetch_optional(&self.pool)
        .await?)
    }

    /* ---------- MOVIES ---------- */

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let movie = movie.into_movie();
        Ok(sqlx::query_as::<_, Movie>(
            r#"
            INSERT INTO movies (id, title, genre, duration, description, language,
                                release_date, rating, trailer_url, poster, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.genre)
        .bind(movie.duration)
        .bind(&movie.description)
        .bind(&movie.language)
        .bind(movie.release_date)
        .bind(movie.rating)
        .bind(&movie.trailer_url)
        .bind(&movie.poster)
        .bind(movie.created_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(sqlx::query_as::<_, Movie>("SELECT * FROM movies ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?)
    }

    /* ---------- SHOWS ---------- */

    async fn insert_show(&self, show: NewShow) -> AppResult<Show> {
        let show = show.into_show();
        Ok(sqlx::query_as::<_, Show>(
            r#"
            INSERT INTO shows (id, theatre_id, movie_id, screen_number, show_time,
                               total_seats, available_seats, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(show.id)
        .bind(show.theatre_id)
        .bind(show.movie_id)
        .bind(show.screen_number)
        .bind(show.show_time)
        .bind(show.total_seats)
        .bind(show.available_seats)
        .bind(show.created_at)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_show(&self, id: Uuid) -> AppResult<Option<Show>> {
        Ok(sqlx::query_as::<_, Show>("SELECT * FROM shows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_shows(&self, filter: ShowFilter) -> AppResult<Vec<Show>> {
        Ok(sqlx::query_as::<_, Show>(
            r#"
            SELECT * FROM shows
            WHERE ($1::uuid IS NULL OR movie_id = $1)
              AND ($2::uuid IS NULL OR theatre_id = $2)
            ORDER BY show_time
            "#,
        )
        .bind(filter.movie_id)
        .bind(filter.theatre_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn owner_screens_movie(&self, owner_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        Ok(sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
              SELECT 1
              FROM shows s
              JOIN theatres t ON t.id = s.theatre_id
              WHERE t.owner_id = $1 AND s.movie_id = $2
            )
            "#,
        )
        .bind(owner_id)
        .bind(movie_id)
        .fetch_one(&self.pool)
        .await?)
    }

    /* ---------- LEDGER ---------- */

    async fn reserve_seats(&self, booking: NewBooking) -> AppResult<ReserveOutcome> {
        let mut tx = self.pool.begin().await?;

        // 1) Lock the show row; concurrent reservations for this show queue here
        let available = sqlx::query_scalar::<_, i32>(
            "SELECT available_seats FROM shows WHERE id = $1 FOR UPDATE",
        )
        .bind(booking.show_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(available) = available else {
            tx.rollback().await?;
            return Ok(ReserveOutcome::ShowNotFound);
        };

        // 2) No label may already belong to a confirmed booking of this show
        let taken = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT held.seat
            FROM bookings b
            CROSS JOIN LATERAL UNNEST(b.seats) AS held(seat)
            WHERE b.show_id = $1 AND b.status = 'confirmed' AND held.seat = ANY($2)
            ORDER BY held.seat
            "#,
        )
        .bind(booking.show_id)
        .bind(&booking.seats)
        .fetch_all(&mut *tx)
        .await?;

        if !taken.is_empty() {
            tx.rollback().await?;
            return Ok(ReserveOutcome::SeatsTaken(taken));
        }

        // 3) Guarded decrement
        let wanted = booking.seat_count();
        let decremented = sqlx::query(
            r#"
            UPDATE shows
            SET available_seats = available_seats - $1
            WHERE id = $2 AND available_seats >= $1
            "#,
        )
        .bind(wanted)
        .bind(booking.show_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if decremented == 0 {
            tx.rollback().await?;
            return Ok(ReserveOutcome::InsufficientSeats { available });
        }

        // 4) The booking row commits together with the decrement
        let booking = booking.into_booking();
        let created = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, user_id, show_id, theatre_id, seats, price_per_seat,
                                  total_amount, status, booking_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.show_id)
        .bind(booking.theatre_id)
        .bind(&booking.seats)
        .bind(booking.price_per_seat)
        .bind(booking.total_amount)
        .bind(booking.status)
        .bind(booking.booking_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReserveOutcome::Reserved(created))
    }

    async fn find_booking_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>> {
        Ok(sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        // The status guard makes a second cancel a no-op
        let cancelled = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = 'cancelled'
            WHERE id = $1 AND user_id = $2 AND status = 'confirmed'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = cancelled else {
            tx.rollback().await?;
            return Ok(None);
        };

        // The CHECK constraint on shows rejects anything above total_seats
        sqlx::query("UPDATE shows SET available_seats = available_seats + $1 WHERE id = $2")
            .bind(booking.seat_count())
            .bind(booking.show_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(booking))
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        Ok(sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY booking_date DESC")
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_bookings_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = $1 ORDER BY booking_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn list_bookings_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Booking>> {
        Ok(sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.*
            FROM bookings b
            JOIN theatres t ON t.id = b.theatre_id
            WHERE t.owner_id = $1
            ORDER BY b.booking_date DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /* ---------- REVIEWS ---------- */

    async fn find_review_by_author(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> AppResult<Option<Review>> {
        Ok(sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_review(&self, review: NewReview) -> AppResult<Review> {
        let review = review.into_review();
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (id, user_id, movie_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(review.id)
        .bind(review.user_id)
        .bind(review.movie_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(review.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, ALREADY_REVIEWED))
    }

    async fn list_reviews_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        Ok(sqlx::query_as::<_, Review>(
            "SELECT * FROM reviews WHERE movie_id = $1 ORDER BY created_at DESC",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn delete_review(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
