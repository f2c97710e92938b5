//! One authorization predicate for every protected operation.
//!
//! Handlers call [`authorize`] before doing any work. Actions that depend on
//! a specific resource carry it, so ownership and approval state are checked
//! in the same place as roles.

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::{Role, Theatre};

#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    // any signed-in account
    ViewProfile,
    UpdateProfile,
    BookSeats,
    CancelOwnBooking,
    ViewOwnBookings,
    WriteReview,

    // theatre owners
    SubmitTheatre,
    ViewOwnTheatres,
    AddMovie,
    ScheduleShows,
    CreateShow { theatre: &'a Theatre },
    ViewOwnerBookings,
    ViewOwnerReviews,

    // administrators
    ManageUsers,
    DecideApproval,
    ViewAllBookings,
    DeleteReview,
}

pub fn authorize(actor: &AuthUser, action: Action<'_>) -> AppResult<()> {
    use Action::*;

    match action {
        ViewProfile | UpdateProfile | BookSeats | CancelOwnBooking | ViewOwnBookings
        | WriteReview => Ok(()),

        SubmitTheatre | ViewOwnTheatres | AddMovie | ScheduleShows | ViewOwnerBookings
        | ViewOwnerReviews => require_role(actor, Role::Owner),

        CreateShow { theatre } => {
            require_role(actor, Role::Owner)?;
            if theatre.owner_id != actor.id {
                return Err(AppError::forbidden("You do not own this theatre"));
            }
            if !theatre.is_approved() {
                return Err(AppError::forbidden(
                    "Theatre must be approved before shows can be scheduled",
                ));
            }
            Ok(())
        }

        ManageUsers | DecideApproval | ViewAllBookings | DeleteReview => {
            if actor.role.is_admin() {
                Ok(())
            } else {
                Err(AppError::forbidden("Admin access required"))
            }
        }
    }
}

fn require_role(actor: &AuthUser, role: Role) -> AppResult<()> {
    if actor.role == role {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("{} access required", capitalize(role.as_str()))))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
