use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use showtime_booking::error::AppError;
use showtime_booking::models::movie::NewMovie;
use showtime_booking::models::show::NewShow;
use showtime_booking::models::theatre::NewTheatre;
use showtime_booking::models::Booking;
use showtime_booking::services::InventoryLedger;
use showtime_booking::store::{MemoryStore, Store};

const CAPACITY: i32 = 8;
const USERS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Reserve { user: usize, seats: Vec<String> },
    Release { user: usize, booking: usize },
}

fn seat_pool() -> Vec<String> {
    (1..=12).map(|n| format!("A{}", n)).collect()
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS, proptest::sample::subsequence(seat_pool(), 1..=4))
            .prop_map(|(user, seats)| Op::Reserve { user, seats }),
        (0..USERS, 0..16usize).prop_map(|(user, booking)| Op::Release { user, booking }),
    ]
}

async fn seeded() -> (InventoryLedger, Arc<dyn Store>, Uuid) {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let theatre = store
        .insert_theatre(NewTheatre {
            name: "Bijou".into(),
            location: "Harbour".into(),
            total_screens: 1,
            owner_id: Uuid::new_v4(),
        })
        .await
        .unwrap();
    let movie = store
        .insert_movie(NewMovie {
            title: "Vertigo".into(),
            genre: vec!["thriller".into()],
            duration: 128,
            description: "Heights".into(),
            language: "English".into(),
            release_date: NaiveDate::from_ymd_opt(1958, 5, 9).unwrap(),
            rating: 8.3,
            trailer_url: None,
            poster: None,
        })
        .await
        .unwrap();
    let show = store
        .insert_show(NewShow {
            theatre_id: theatre.id,
            movie_id: movie.id,
            screen_number: 1,
            show_time: Utc::now(),
            total_seats: CAPACITY,
        })
        .await
        .unwrap();
    (InventoryLedger::new(store.clone()), store, show.id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn ledger_matches_a_simple_model(ops in proptest::collection::vec(op(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let (ledger, store, show_id) = seeded().await;
            let users: Vec<Uuid> = (0..USERS).map(|_| Uuid::new_v4()).collect();

            let mut available = CAPACITY;
            let mut held: HashSet<String> = HashSet::new();
            // (booking, owner index, still confirmed)
            let mut bookings: Vec<(Booking, usize, bool)> = Vec::new();

            for op in ops {
                match op {
                    Op::Reserve { user, seats } => {
                        let wanted = seats.len() as i32;
                        let collides = seats.iter().any(|s| held.contains(s));
                        let result = ledger.reserve(users[user], show_id, seats.clone(), 7.5).await;

                        if wanted > available {
                            prop_assert!(matches!(result, Err(AppError::InsufficientSeats)));
                        } else if collides {
                            prop_assert!(matches!(result, Err(AppError::Conflict(_))));
                        } else {
                            let booking = result.unwrap();
                            prop_assert_eq!(booking.seat_count(), wanted);
                            available -= wanted;
                            held.extend(seats);
                            bookings.push((booking, user, true));
                        }
                    }
                    Op::Release { user, booking } => {
                        let Some(entry) = bookings.get_mut(booking) else {
                            continue;
                        };
                        let result = ledger.release(users[user], entry.0.id).await;

                        if entry.1 != user {
                            prop_assert!(matches!(result, Err(AppError::NotFound("Booking"))));
                        } else if !entry.2 {
                            prop_assert!(matches!(result, Err(AppError::AlreadyCancelled)));
                        } else {
                            prop_assert!(result.is_ok());
                            entry.2 = false;
                            available += entry.0.seat_count();
                            for seat in &entry.0.seats {
                                held.remove(seat);
                            }
                        }
                    }
                }

                let show = store.find_show(show_id).await.unwrap().unwrap();
                prop_assert!(show.available_seats >= 0);
                prop_assert!(show.available_seats <= show.total_seats);
                prop_assert_eq!(show.available_seats, available);
            }
            Ok(())
        })?;
    }
}
