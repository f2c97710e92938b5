//! Pending / approved / rejected lifecycle shared by theatres and admin
//! accounts.
//!
//! The persisted status enums differ (`TheatreStatus::Approved` versus
//! `AccountStatus::Active`), so both implement [`Approvable`] and a
//! [`Decision`] is turned into a concrete [`StatusChange`] for either one.
//! There is no transition out of a decided state other than deciding again,
//! which simply rewrites the same fields.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{AccountStatus, TheatreStatus, User};

pub const DEFAULT_REJECTION_REASON: &str = "No reason provided";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject { reason: String },
}

impl Decision {
    /// Parses the `action` field of a decision request. Unknown actions are
    /// rejected here, before anything is looked up.
    pub fn parse(action: &str, reason: Option<String>) -> AppResult<Self> {
        match action.trim().to_ascii_lowercase().as_str() {
            "approve" | "approved" => Ok(Decision::Approve),
            "reject" | "rejected" => {
                let reason = reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string());
                Ok(Decision::Reject { reason })
            }
            _ => Err(AppError::validation(
                "Invalid action, expected 'approve' or 'reject'",
            )),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject { .. } => "rejected",
        }
    }

    /// The field values to persist when `decided_by` applies this decision.
    pub fn apply<S: Approvable>(&self, decided_by: Uuid) -> StatusChange<S> {
        match self {
            Decision::Approve => StatusChange {
                status: S::approved(),
                rejection_reason: None,
                approved_by: Some(decided_by),
            },
            Decision::Reject { reason } => StatusChange {
                status: S::rejected(),
                rejection_reason: Some(reason.clone()),
                approved_by: None,
            },
        }
    }
}

/// A status enum with an approved and a rejected terminal state.
pub trait Approvable: Copy {
    fn approved() -> Self;
    fn rejected() -> Self;
}

impl Approvable for TheatreStatus {
    fn approved() -> Self {
        TheatreStatus::Approved
    }

    fn rejected() -> Self {
        TheatreStatus::Rejected
    }
}

impl Approvable for AccountStatus {
    fn approved() -> Self {
        AccountStatus::Active
    }

    fn rejected() -> Self {
        AccountStatus::Rejected
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange<S> {
    pub status: S,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<Uuid>,
}

/// Login gate: pending accounts are blocked, rejected ones are blocked with
/// the stored reason.
pub fn ensure_can_login(user: &User) -> AppResult<()> {
    match user.status {
        AccountStatus::Active => Ok(()),
        AccountStatus::Pending => Err(AppError::forbidden(
            "Your account is pending approval by an administrator",
        )),
        AccountStatus::Rejected => Err(AppError::forbidden(format!(
            "Your account has been rejected: {}",
            user.rejection_reason
                .as_deref()
                .unwrap_or(DEFAULT_REJECTION_REASON)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{NewUser, Role};

    fn admin_user() -> User {
        NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "x".into(),
            role: Role::Admin,
        }
        .into_user()
    }

    #[test]
    fn unknown_action_is_a_validation_error() {
        let err = Decision::parse("promote", None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn reject_without_reason_gets_placeholder() {
        let decision = Decision::parse("reject", Some("   ".into())).unwrap();
        assert_eq!(
            decision,
            Decision::Reject {
                reason: DEFAULT_REJECTION_REASON.to_string()
            }
        );
    }

    #[test]
    fn approve_clears_reason_and_records_approver() {
        let admin = Uuid::new_v4();
        let change: StatusChange<TheatreStatus> = Decision::Approve.apply(admin);
        assert_eq!(change.status, TheatreStatus::Approved);
        assert_eq!(change.rejection_reason, None);
        assert_eq!(change.approved_by, Some(admin));

        let change: StatusChange<AccountStatus> = Decision::Approve.apply(admin);
        assert_eq!(change.status, AccountStatus::Active);
    }

    #[test]
    fn reject_stores_reason() {
        let decision = Decision::parse("REJECT", Some("Incomplete paperwork".into())).unwrap();
        let change: StatusChange<AccountStatus> = decision.apply(Uuid::new_v4());
        assert_eq!(change.status, AccountStatus::Rejected);
        assert_eq!(change.rejection_reason.as_deref(), Some("Incomplete paperwork"));
        assert_eq!(change.approved_by, None);
    }

    #[test]
    fn login_gate_follows_account_status() {
        let mut user = admin_user();
        assert!(matches!(ensure_can_login(&user), Err(AppError::Forbidden(_))));

        user.status = AccountStatus::Rejected;
        user.rejection_reason = Some("Duplicate account".into());
        match ensure_can_login(&user) {
            Err(AppError::Forbidden(msg)) => assert!(msg.contains("Duplicate account")),
            other => panic!("unexpected: {:?}", other),
        }

        user.status = AccountStatus::Active;
        assert!(ensure_can_login(&user).is_ok());
    }
}
