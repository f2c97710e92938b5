//! Admin decisions over theatres and admin accounts.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::approval::Decision;
use crate::cache::CacheService;
use crate::error::{AppError, AppResult};
use crate::models::theatre::NewTheatre;
use crate::models::{AccountStatus, Role, Theatre, User};
use crate::store::Store;

#[derive(Clone)]
pub struct ApprovalService {
    store: Arc<dyn Store>,
    cache: CacheService,
}

impl ApprovalService {
    pub fn new(store: Arc<dyn Store>, cache: CacheService) -> Self {
        Self { store, cache }
    }

    /// New theatres always start pending.
    pub async fn submit_theatre(&self, theatre: NewTheatre) -> AppResult<Theatre> {
        if theatre.total_screens < 1 {
            return Err(AppError::validation("A theatre needs at least one screen"));
        }

        let theatre = self.store.insert_theatre(theatre).await?;
        self.cache.invalidate_theatres().await;

        info!(theatre_id = %theatre.id, owner_id = %theatre.owner_id, "theatre submitted for approval");
        Ok(theatre)
    }

    pub async fn decide_theatre(
        &self,
        admin_id: Uuid,
        theatre_id: Uuid,
        decision: Decision,
    ) -> AppResult<Theatre> {
        let theatre = self
            .store
            .set_theatre_status(theatre_id, decision.apply(admin_id))
            .await?
            .ok_or(AppError::NotFound("Theatre"))?;
        self.cache.invalidate_theatres().await;

        info!(theatre_id = %theatre.id, admin_id = %admin_id, decision = decision.label(), "theatre decided");
        Ok(theatre)
    }

    pub async fn decide_user(
        &self,
        admin_id: Uuid,
        user_id: Uuid,
        decision: Decision,
    ) -> AppResult<User> {
        let target = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(AppError::NotFound("User"))?;
        if target.role != Role::Admin {
            return Err(AppError::forbidden(
                "Only admin accounts can be approved or rejected",
            ));
        }

        let user = self
            .store
            .set_user_status(user_id, decision.apply(admin_id))
            .await?
            .ok_or(AppError::NotFound("User"))?;

        info!(user_id = %user.id, admin_id = %admin_id, decision = decision.label(), "account decided");
        Ok(user)
    }

    pub async fn pending_admins(&self) -> AppResult<Vec<User>> {
        self.store
            .list_users_with(Role::Admin, AccountStatus::Pending)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::NewUser;
    use crate::models::TheatreStatus;
    use crate::store::MemoryStore;

    fn service() -> (ApprovalService, Arc<dyn Store>) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        (ApprovalService::new(store.clone(), CacheService::disabled()), store)
    }

    fn theatre_for(owner_id: Uuid) -> NewTheatre {
        NewTheatre {
            name: "Grand".into(),
            location: "Main St".into(),
            total_screens: 3,
            owner_id,
        }
    }

    #[tokio::test]
    async fn theatre_moves_from_pending_to_decided() {
        let (service, _) = service();
        let admin = Uuid::new_v4();

        let theatre = service.submit_theatre(theatre_for(Uuid::new_v4())).await.unwrap();
        assert_eq!(theatre.status, TheatreStatus::Pending);

        let approved = service
            .decide_theatre(admin, theatre.id, Decision::Approve)
            .await
            .unwrap();
        assert_eq!(approved.status, TheatreStatus::Approved);
        assert_eq!(approved.approved_by, Some(admin));

        let rejected = service
            .decide_theatre(admin, theatre.id, Decision::parse("reject", None).unwrap())
            .await
            .unwrap();
        assert_eq!(rejected.status, TheatreStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("No reason provided"));
        assert_eq!(rejected.approved_by, None);
    }

    #[tokio::test]
    async fn deciding_missing_entities_is_not_found() {
        let (service, _) = service();
        assert!(matches!(
            service.decide_theatre(Uuid::new_v4(), Uuid::new_v4(), Decision::Approve).await,
            Err(AppError::NotFound("Theatre"))
        ));
        assert!(matches!(
            service.decide_user(Uuid::new_v4(), Uuid::new_v4(), Decision::Approve).await,
            Err(AppError::NotFound("User"))
        ));
    }

    #[tokio::test]
    async fn pending_admins_lists_only_waiting_admins() {
        let (service, store) = service();
        let admin = store
            .insert_user(NewUser {
                name: "Grace".into(),
                email: "grace@example.com".into(),
                password_hash: "h".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        store
            .insert_user(NewUser {
                name: "Linus".into(),
                email: "linus@example.com".into(),
                password_hash: "h".into(),
                role: Role::User,
            })
            .await
            .unwrap();

        let pending = service.pending_admins().await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, admin.id);

        service
            .decide_user(Uuid::new_v4(), admin.id, Decision::Approve)
            .await
            .unwrap();
        assert!(service.pending_admins().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn only_admin_accounts_are_decidable() {
        let (service, store) = service();
        for (i, role) in [Role::User, Role::Owner, Role::SuperAdmin].into_iter().enumerate() {
            let target = store
                .insert_user(NewUser {
                    name: "Target".into(),
                    email: format!("target{}@example.com", i),
                    password_hash: "h".into(),
                    role,
                })
                .await
                .unwrap();

            let result = service
                .decide_user(Uuid::new_v4(), target.id, Decision::parse("reject", None).unwrap())
                .await;
            assert!(matches!(result, Err(AppError::Forbidden(_))), "{:?} was decidable", role);

            let unchanged = store.find_user(target.id).await.unwrap().unwrap();
            assert_eq!(unchanged.status, AccountStatus::Active);
        }
    }
}
