pub mod user;
pub mod theatre;
pub mod movie;
pub mod show;
pub mod booking;
pub mod review;

pub use user::{AccountStatus, Role, User};
pub use theatre::{Theatre, TheatreStatus};
pub use movie::Movie;
pub use show::Show;
pub use booking::{Booking, BookingStatus};
pub use review::Review;
