#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub use memory::{active_event_at, InMemoryPresenceRepository, MemoryAuditRecorder};

#[cfg(test)]
#[allow(dead_code)]
pub fn create_super_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-account-id".to_string(),
        sub: "test-sub".to_string(),
        session_uid: Some("test-session-uid".to_string()),
        roles: vec!["super_admin".to_string()],
    }
}

#[cfg(test)]
#[allow(dead_code)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-admin-id".to_string(),
        sub: "test-admin-sub".to_string(),
        session_uid: None,
        roles: vec!["admin".to_string()],
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_super_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_super_admin_user());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_super_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_super_admin_middleware))
}

#[cfg(test)]
#[allow(dead_code)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

#[cfg(test)]
mod memory {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use fake::faker::name::en::Name;
    use fake::Fake;
    use tokio::sync::RwLock;
    use uuid::Uuid;

    use crate::core::error::{AppError, Result};
    use crate::features::audit_logs::models::NewAuditLog;
    use crate::features::audit_logs::AuditRecorder;
    use crate::features::events::models::Event;
    use crate::features::presences::models::{
        Presence, PresenceRecord, PresenceStatus, RosterEntry, StatusTally,
    };
    use crate::features::presences::repository::{
        PresenceRepository, DUPLICATE_PRESENCE_MESSAGE,
    };

    /// Event running from an hour ago until an hour from now
    pub fn active_event_at(latitude: f64, longitude: f64) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: "Pengajian Remaja".to_string(),
            description: String::new(),
            start_date: now - Duration::hours(1),
            end_date: now + Duration::hours(1),
            latitude,
            longitude,
            created_at: now,
            updated_at: now,
        }
    }

    #[derive(Debug, Clone)]
    struct MemberRow {
        id: Uuid,
        name: String,
        kelompok_id: Uuid,
        kelompok_name: String,
    }

    #[derive(Default)]
    struct Store {
        events: Vec<Event>,
        generus: Vec<MemberRow>,
        presences: Vec<Presence>,
    }

    /// `PresenceRepository` over plain vectors, with the same uniqueness rule
    /// as the `presences` table
    #[derive(Default)]
    pub struct InMemoryPresenceRepository {
        store: RwLock<Store>,
    }

    #[allow(dead_code)]
    impl InMemoryPresenceRepository {
        pub async fn add_event(&self, event: Event) {
            self.store.write().await.events.push(event);
        }

        /// Add a generus with a generated name; the kelompok is created on first use
        pub async fn add_generus(&self, kelompok_name: &str) -> Uuid {
            let mut store = self.store.write().await;
            let kelompok_id = store
                .generus
                .iter()
                .find(|g| g.kelompok_name == kelompok_name)
                .map(|g| g.kelompok_id)
                .unwrap_or_else(Uuid::new_v4);

            let id = Uuid::new_v4();
            store.generus.push(MemberRow {
                id,
                name: Name().fake(),
                kelompok_id,
                kelompok_name: kelompok_name.to_string(),
            });
            id
        }

        pub async fn kelompok_of(&self, generus_id: Uuid) -> Option<Uuid> {
            self.store
                .read()
                .await
                .generus
                .iter()
                .find(|g| g.id == generus_id)
                .map(|g| g.kelompok_id)
        }

        pub async fn presence_count(&self) -> usize {
            self.store.read().await.presences.len()
        }
    }

    #[async_trait]
    impl PresenceRepository for InMemoryPresenceRepository {
        async fn find_event(&self, event_id: Uuid) -> Result<Option<Event>> {
            let store = self.store.read().await;
            Ok(store.events.iter().find(|e| e.id == event_id).cloned())
        }

        async fn generus_exists(&self, generus_id: Uuid) -> Result<bool> {
            let store = self.store.read().await;
            Ok(store.generus.iter().any(|g| g.id == generus_id))
        }

        async fn presence_exists(&self, event_id: Uuid, generus_id: Uuid) -> Result<bool> {
            let store = self.store.read().await;
            Ok(store
                .presences
                .iter()
                .any(|p| p.event_id == event_id && p.generus_id == generus_id))
        }

        async fn insert(
            &self,
            event_id: Uuid,
            generus_id: Uuid,
            status: PresenceStatus,
        ) -> Result<Presence> {
            let mut store = self.store.write().await;
            if store
                .presences
                .iter()
                .any(|p| p.event_id == event_id && p.generus_id == generus_id)
            {
                return Err(AppError::Conflict(DUPLICATE_PRESENCE_MESSAGE.to_string()));
            }

            let presence = Presence {
                id: Uuid::new_v4(),
                event_id,
                generus_id,
                status,
                created_at: Utc::now(),
            };
            store.presences.push(presence.clone());
            Ok(presence)
        }

        async fn tally(&self, event_id: Uuid) -> Result<StatusTally> {
            let store = self.store.read().await;
            let mut tally = StatusTally::default();
            for presence in store.presences.iter().filter(|p| p.event_id == event_id) {
                match presence.status {
                    PresenceStatus::Present => tally.hadir += 1,
                    PresenceStatus::Excused => tally.izin += 1,
                    PresenceStatus::Absent => tally.alpha += 1,
                }
            }
            Ok(tally)
        }

        async fn roster(
            &self,
            event_id: Uuid,
            kelompok_id: Option<Uuid>,
        ) -> Result<Vec<RosterEntry>> {
            let store = self.store.read().await;
            let mut entries: Vec<RosterEntry> = store
                .generus
                .iter()
                .filter(|g| kelompok_id.is_none_or(|k| g.kelompok_id == k))
                .map(|g| RosterEntry {
                    generus_id: g.id,
                    generus_name: g.name.clone(),
                    kelompok_name: g.kelompok_name.clone(),
                    is_disabled: store
                        .presences
                        .iter()
                        .any(|p| p.event_id == event_id && p.generus_id == g.id),
                })
                .collect();
            entries.sort_by(|a, b| {
                (&a.kelompok_name, &a.generus_name).cmp(&(&b.kelompok_name, &b.generus_name))
            });
            Ok(entries)
        }

        async fn list_for_event(
            &self,
            event_id: Uuid,
            offset: i64,
            limit: i64,
        ) -> Result<(Vec<PresenceRecord>, i64)> {
            let store = self.store.read().await;
            let records: Vec<PresenceRecord> = store
                .presences
                .iter()
                .rev()
                .filter(|p| p.event_id == event_id)
                .filter_map(|p| {
                    let member = store.generus.iter().find(|g| g.id == p.generus_id)?;
                    Some(PresenceRecord {
                        id: p.id,
                        event_id: p.event_id,
                        generus_id: p.generus_id,
                        generus_name: member.name.clone(),
                        kelompok_name: member.kelompok_name.clone(),
                        status: p.status,
                        created_at: p.created_at,
                    })
                })
                .collect();

            let total = records.len() as i64;
            let page = records
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect();
            Ok((page, total))
        }

        async fn delete(&self, id: Uuid) -> Result<Option<Presence>> {
            let mut store = self.store.write().await;
            let position = store.presences.iter().position(|p| p.id == id);
            Ok(position.map(|i| store.presences.remove(i)))
        }
    }

    /// Audit sink that keeps entries for assertions
    #[derive(Default)]
    pub struct MemoryAuditRecorder {
        entries: RwLock<Vec<NewAuditLog>>,
    }

    impl MemoryAuditRecorder {
        pub async fn entries(&self) -> Vec<NewAuditLog> {
            self.entries.read().await.clone()
        }
    }

    #[async_trait]
    impl AuditRecorder for MemoryAuditRecorder {
        async fn record(&self, entry: NewAuditLog) -> Result<()> {
            self.entries.write().await.push(entry);
            Ok(())
        }
    }
}
