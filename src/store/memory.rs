use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ReserveOutcome, Store};
use crate::approval::StatusChange;
use crate::error::{AppError, AppResult};
use crate::models::booking::NewBooking;
use crate::models::movie::NewMovie;
use crate::models::review::NewReview;
use crate::models::show::{NewShow, ShowFilter};
use crate::models::theatre::NewTheatre;
use crate::models::user::{NewUser, ProfileChanges};
use crate::models::{
    AccountStatus, Booking, BookingStatus, Movie, Review, Role, Show, Theatre, TheatreStatus, User,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    theatres: HashMap<Uuid, Theatre>,
    movies: HashMap<Uuid, Movie>,
    shows: HashMap<Uuid, Show>,
    bookings: HashMap<Uuid, Booking>,
    reviews: HashMap<Uuid, Review>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.email == email && Some(u.id) != except)
    }

    fn owner_theatres(&self, owner_id: Uuid) -> BTreeSet<Uuid> {
        self.theatres
            .values()
            .filter(|t| t.owner_id == owner_id)
            .map(|t| t.id)
            .collect()
    }
}

/// Single-process store. Every write takes the one write guard, which is
/// what makes the ledger operations atomic here.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, None) {
            return Err(AppError::conflict("Email is already registered"));
        }
        let user = user.into_user();
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let users = self.tables.read().await.users.values().cloned().collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn list_users_with(&self, role: Role, status: AccountStatus) -> AppResult<Vec<User>> {
        let users = self
            .tables
            .read()
            .await
            .users
            .values()
            .filter(|u| u.role == role && u.status == status)
            .cloned()
            .collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        if let Some(email) = changes.email.as_deref() {
            if tables.email_taken(email, Some(id)) {
                return Err(AppError::conflict("Email is already registered"));
            }
        }
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn set_user_status(
        &self,
        id: Uuid,
        change: StatusChange<AccountStatus>,
    ) -> AppResult<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            user.status = change.status;
            user.rejection_reason = change.rejection_reason;
            user.approved_by = change.approved_by;
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.users.remove(&id).is_some())
    }

    async fn insert_theatre(&self, theatre: NewTheatre) -> AppResult<Theatre> {
        let theatre = theatre.into_theatre();
        self.tables
            .write()
            .await
            .theatres
            .insert(theatre.id, theatre.clone());
        Ok(theatre)
    }

    async fn find_theatre(&self, id: Uuid) -> AppResult<Option<Theatre>> {
        Ok(self.tables.read().await.theatres.get(&id).cloned())
    }

    async fn list_theatres(&self) -> AppResult<Vec<Theatre>> {
        let theatres = self.tables.read().await.theatres.values().cloned().collect();
        Ok(newest_first(theatres, |t: &Theatre| t.created_at))
    }

    async fn list_theatres_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Theatre>> {
        let theatres = self
            .tables
            .read()
            .await
            .theatres
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        Ok(newest_first(theatres, |t: &Theatre| t.created_at))
    }

    async fn set_theatre_status(
        &self,
        id: Uuid,
        change: StatusChange<TheatreStatus>,
    ) -> AppResult<Option<Theatre>> {
        let mut tables = self.tables.write().await;
        Ok(tables.theatres.get_mut(&id).map(|theatre| {
            theatre.status = change.status;
            theatre.rejection_reason = change.rejection_reason;
            theatre.approved_by = change.approved_by;
            theatre.clone()
        }))
    }

    async fn insert_movie(&self, movie: NewMovie) -> AppResult<Movie> {
        let movie = movie.into_movie();
        self.tables
            .write()
            .await
            .movies
            .insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn find_movie(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let movies = self.tables.read().await.movies.values().cloned().collect();
        Ok(newest_first(movies, |m: &Movie| m.created_at))
    }

    async fn insert_show(&self, show: NewShow) -> AppResult<Show> {
        let show = show.into_show();
        self.tables.write().await.shows.insert(show.id, show.clone());
        Ok(show)
    }

    async fn find_show(&self, id: Uuid) -> AppResult<Option<Show>> {
        Ok(self.tables.read().await.shows.get(&id).cloned())
    }

    async fn list_shows(&self, filter: ShowFilter) -> AppResult<Vec<Show>> {
        let mut shows: Vec<Show> = self
            .tables
            .read()
            .await
            .shows
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        shows.sort_by_key(|s| s.show_time);
        Ok(shows)
    }

    async fn owner_screens_movie(&self, owner_id: Uuid, movie_id: Uuid) -> AppResult<bool> {
        let tables = self.tables.read().await;
        let theatres = tables.owner_theatres(owner_id);
        Ok(tables
            .shows
            .values()
            .any(|s| s.movie_id == movie_id && theatres.contains(&s.theatre_id)))
    }

    async fn reserve_seats(&self, booking: NewBooking) -> AppResult<ReserveOutcome> {
        let mut tables = self.tables.write().await;

        let Some(available) = tables.shows.get(&booking.show_id).map(|s| s.available_seats) else {
            return Ok(ReserveOutcome::ShowNotFound);
        };

        let held: BTreeSet<&str> = tables
            .bookings
            .values()
            .filter(|b| b.show_id == booking.show_id && b.is_confirmed())
            .flat_map(|b| b.seats.iter().map(String::as_str))
            .collect();
        let taken: Vec<String> = booking
            .seats
            .iter()
            .filter(|s| held.contains(s.as_str()))
            .cloned()
            .collect();
        if !taken.is_empty() {
            return Ok(ReserveOutcome::SeatsTaken(taken));
        }

        let wanted = booking.seat_count();
        if wanted > available {
            return Ok(ReserveOutcome::InsufficientSeats { available });
        }

        if let Some(show) = tables.shows.get_mut(&booking.show_id) {
            show.available_seats -= wanted;
        }
        let booking = booking.into_booking();
        tables.bookings.insert(booking.id, booking.clone());
        Ok(ReserveOutcome::Reserved(booking))
    }

    async fn find_booking_for_user(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables
            .bookings
            .get(&id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn cancel_booking(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Booking>> {
        let mut tables = self.tables.write().await;

        let Some((show_id, seat_count)) = tables
            .bookings
            .get(&id)
            .filter(|b| b.user_id == user_id && b.is_confirmed())
            .map(|b| (b.show_id, b.seat_count()))
        else {
            return Ok(None);
        };

        // Check the show side first so a failure leaves both records untouched
        let show = tables
            .shows
            .get_mut(&show_id)
            .ok_or_else(|| AppError::internal(format!("booking {} points at a missing show", id)))?;
        let restored = show.available_seats + seat_count;
        if restored > show.total_seats {
            return Err(AppError::internal(format!(
                "cancelling booking {} would push show {} above capacity",
                id, show_id
            )));
        }
        show.available_seats = restored;

        let booking = tables
            .bookings
            .get_mut(&id)
            .map(|b| {
                b.status = BookingStatus::Cancelled;
                b.clone()
            });
        Ok(booking)
    }

    async fn list_bookings(&self) -> AppResult<Vec<Booking>> {
        let bookings = self.tables.read().await.bookings.values().cloned().collect();
        Ok(newest_first(bookings, |b: &Booking| b.booking_date))
    }

    async fn list_bookings_by_user(&self, user_id: Uuid) -> AppResult<Vec<Booking>> {
        let bookings = self
            .tables
            .read()
            .await
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(bookings, |b: &Booking| b.booking_date))
    }

    async fn list_bookings_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Booking>> {
        let tables = self.tables.read().await;
        let theatres = tables.owner_theatres(owner_id);
        let bookings = tables
            .bookings
            .values()
            .filter(|b| theatres.contains(&b.theatre_id))
            .cloned()
            .collect();
        Ok(newest_first(bookings, |b: &Booking| b.booking_date))
    }

    async fn find_review_by_author(
        &self,
        user_id: Uuid,
        movie_id: Uuid,
    ) -> AppResult<Option<Review>> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .values()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
            .cloned())
    }

    async fn insert_review(&self, review: NewReview) -> AppResult<Review> {
        let mut tables = self.tables.write().await;
        let duplicate = tables
            .reviews
            .values()
            .any(|r| r.user_id == review.user_id && r.movie_id == review.movie_id);
        if duplicate {
            return Err(AppError::conflict("You have already reviewed this movie"));
        }
        let review = review.into_review();
        tables.reviews.insert(review.id, review.clone());
        Ok(review)
    }

    async fn list_reviews_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        let reviews = self
            .tables
            .read()
            .await
            .reviews
            .values()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        Ok(newest_first(reviews, |r: &Review| r.created_at))
    }

    async fn delete_review(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.tables.write().await.reviews.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn seeded_show(store: &MemoryStore, capacity: i32) -> Show {
        let theatre = store
            .insert_theatre(NewTheatre {
                name: "Lumiere".into(),
                location: "Quay".into(),
                total_screens: 1,
                owner_id: Uuid::new_v4(),
            })
            .await
            .unwrap();
        store
            .insert_show(NewShow {
                theatre_id: theatre.id,
                movie_id: Uuid::new_v4(),
                screen_number: 1,
                show_time: Utc::now(),
                total_seats: capacity,
            })
            .await
            .unwrap()
    }

    fn booking_for(show: &Show, user_id: Uuid, seats: &[&str]) -> NewBooking {
        NewBooking {
            user_id,
            show_id: show.id,
            theatre_id: show.theatre_id,
            seats: seats.iter().map(|s| s.to_string()).collect(),
            price_per_seat: 10.0,
        }
    }

    #[tokio::test]
    async fn reserve_is_all_or_nothing() {
        let store = MemoryStore::new();
        let show = seeded_show(&store, 2).await;
        let user = Uuid::new_v4();

        let outcome = store
            .reserve_seats(booking_for(&show, user, &["A1", "A2", "A3"]))
            .await
            .unwrap();
        assert!(matches!(outcome, ReserveOutcome::InsufficientSeats { available: 2 }));
        assert_eq!(store.find_show(show.id).await.unwrap().unwrap().available_seats, 2);
        assert!(store.list_bookings().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn held_labels_are_reported() {
        let store = MemoryStore::new();
        let show = seeded_show(&store, 10).await;

        let first = store
            .reserve_seats(booking_for(&show, Uuid::new_v4(), &["B1", "B2"]))
            .await
            .unwrap();
        assert!(matches!(first, ReserveOutcome::Reserved(_)));

        let second = store
            .reserve_seats(booking_for(&show, Uuid::new_v4(), &["B2", "B3"]))
            .await
            .unwrap();
        match second {
            ReserveOutcome::SeatsTaken(labels) => assert_eq!(labels, vec!["B2".to_string()]),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.find_show(show.id).await.unwrap().unwrap().available_seats, 8);
    }

    #[tokio::test]
    async fn cancel_only_applies_once() {
        let store = MemoryStore::new();
        let show = seeded_show(&store, 5).await;
        let user = Uuid::new_v4();
        let ReserveOutcome::Reserved(booking) = store
            .reserve_seats(booking_for(&show, user, &["C1"]))
            .await
            .unwrap()
        else {
            panic!("reserve failed");
        };

        assert!(store.cancel_booking(booking.id, Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.cancel_booking(booking.id, user).await.unwrap().is_some());
        assert!(store.cancel_booking(booking.id, user).await.unwrap().is_none());
        assert_eq!(store.find_show(show.id).await.unwrap().unwrap().available_seats, 5);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = MemoryStore::new();
        let new_user = || NewUser {
            name: "Sam".into(),
            email: "sam@example.com".into(),
            password_hash: "h".into(),
            role: Role::User,
        };
        store.insert_user(new_user()).await.unwrap();
        assert!(matches!(
            store.insert_user(new_user()).await,
            Err(AppError::Conflict(_))
        ));
    }
}
