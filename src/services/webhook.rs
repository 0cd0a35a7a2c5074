// services/webhook.rs - Identity-provider webhook events and how they land in the store
//
// Every event maps to an upsert keyed on the provider's id (or a delete by
// it), so redelivery never duplicates rows.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::database::models::{
    NewMembership, NewOrganization, NewProfile, NewRole, NewWaitlistEntry, Organization, WaitlistStatus,
};
use crate::database::{DatabaseError, PortalStore};

/// Envelope as delivered: `{"type": "...", "data": {...}}`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationData {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicUserData {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembershipData {
    pub id: String,
    pub role: Option<String>,
    pub organization: OrganizationData,
    pub public_user_data: PublicUserData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleData {
    pub id: String,
    pub key: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaitlistData {
    pub id: String,
    pub email_address: String,
    pub status: WaitlistStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeletedData {
    pub id: String,
}

#[derive(Debug, Clone)]
pub enum WebhookEvent {
    UserUpserted(UserData),
    OrganizationUpserted(OrganizationData),
    MembershipUpserted(MembershipData),
    MembershipDeleted { id: String },
    RoleUpserted(RoleData),
    WaitlistUpserted(WaitlistData),
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Malformed '{kind}' payload: {source}")]
    Payload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// What handling an event amounted to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    Applied,
    Ignored,
}

impl WebhookEvent {
    pub fn parse(envelope: WebhookEnvelope) -> Result<Self, WebhookError> {
        let WebhookEnvelope { kind, data } = envelope;

        let event = match kind.as_str() {
            "user.created" | "user.updated" => WebhookEvent::UserUpserted(decode(&kind, data)?),
            "organization.created" | "organization.updated" => {
                WebhookEvent::OrganizationUpserted(decode(&kind, data)?)
            }
            "organizationMembership.created" | "organizationMembership.updated" => {
                WebhookEvent::MembershipUpserted(decode(&kind, data)?)
            }
            "organizationMembership.deleted" => {
                let deleted: DeletedData = decode(&kind, data)?;
                WebhookEvent::MembershipDeleted { id: deleted.id }
            }
            "role.created" | "role.updated" => WebhookEvent::RoleUpserted(decode(&kind, data)?),
            "waitlistEntry.created" | "waitlistEntry.updated" => WebhookEvent::WaitlistUpserted(decode(&kind, data)?),
            _ => WebhookEvent::Unknown(kind),
        };
        Ok(event)
    }

    pub async fn apply(self, store: &dyn PortalStore) -> Result<WebhookOutcome, WebhookError> {
        match self {
            WebhookEvent::UserUpserted(user) => {
                let full_name = match (user.first_name, user.last_name) {
                    (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
                    (first, last) => first.or(last),
                };
                store
                    .upsert_profile(NewProfile {
                        email: user.email_addresses.into_iter().next().map(|e| e.email_address),
                        user_id: user.id,
                        full_name,
                        avatar_url: user.image_url,
                    })
                    .await?;
            }
            WebhookEvent::OrganizationUpserted(org) => {
                upsert_organization(store, org).await?;
            }
            WebhookEvent::MembershipUpserted(membership) => {
                let org = upsert_organization(store, membership.organization).await?;
                store
                    .upsert_membership(NewMembership {
                        external_id: membership.id,
                        organization_id: org.id,
                        user_id: membership.public_user_data.user_id,
                        role: membership.role,
                    })
                    .await?;
            }
            WebhookEvent::MembershipDeleted { id } => {
                if !store.delete_membership(&id).await? {
                    tracing::debug!("Membership '{}' already gone", id);
                }
            }
            WebhookEvent::RoleUpserted(role) => {
                store
                    .upsert_role(NewRole {
                        external_id: role.id,
                        key: role.key,
                        name: role.name,
                        description: role.description,
                    })
                    .await?;
            }
            WebhookEvent::WaitlistUpserted(entry) => {
                store
                    .upsert_waitlist_entry(NewWaitlistEntry {
                        external_id: entry.id,
                        email_address: entry.email_address,
                        status: entry.status,
                    })
                    .await?;
            }
            WebhookEvent::Unknown(kind) => {
                tracing::info!("Ignoring webhook event '{}'", kind);
                return Ok(WebhookOutcome::Ignored);
            }
        }
        Ok(WebhookOutcome::Applied)
    }
}

fn decode<T: DeserializeOwned>(kind: &str, data: Value) -> Result<T, WebhookError> {
    serde_json::from_value(data).map_err(|source| WebhookError::Payload {
        kind: kind.to_string(),
        source,
    })
}

async fn upsert_organization(store: &dyn PortalStore, org: OrganizationData) -> Result<Organization, DatabaseError> {
    store
        .upsert_organization(NewOrganization {
            external_id: org.id,
            name: org.name,
            slug: org.slug,
        })
        .await
}

/// Compare the delivered secret without short-circuiting on the first mismatch
pub fn secret_matches(expected: &str, provided: &str) -> bool {
    if expected.is_empty() || expected.len() != provided.len() {
        return false;
    }
    expected
        .bytes()
        .zip(provided.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    fn event(value: Value) -> WebhookEvent {
        WebhookEvent::parse(serde_json::from_value(value).unwrap()).unwrap()
    }

    #[test]
    fn secret_comparison() {
        assert!(secret_matches("whsec", "whsec"));
        assert!(!secret_matches("whsec", "whsex"));
        assert!(!secret_matches("whsec", "whsec2"));
        assert!(!secret_matches("", ""));
    }

    #[test]
    fn unknown_events_are_not_errors() {
        assert!(matches!(
            event(json!({"type": "session.created", "data": {"id": "sess_1"}})),
            WebhookEvent::Unknown(kind) if kind == "session.created"
        ));
    }

    #[test]
    fn malformed_payloads_name_the_event() {
        let envelope: WebhookEnvelope = serde_json::from_value(json!({"type": "role.created", "data": {}})).unwrap();
        let err = WebhookEvent::parse(envelope).unwrap_err();
        assert!(err.to_string().contains("role.created"));
    }

    #[tokio::test]
    async fn membership_redelivery_is_idempotent() {
        let store = MemoryStore::new();
        let delivery = json!({
            "type": "organizationMembership.created",
            "data": {
                "id": "orgmem_1",
                "role": "org:member",
                "organization": {"id": "org_1", "name": "Acme", "slug": "acme"},
                "public_user_data": {"user_id": "user_1"}
            }
        });

        for _ in 0..2 {
            assert_eq!(event(delivery.clone()).apply(&store).await.unwrap(), WebhookOutcome::Applied);
        }

        let org = store.get_organization_by_external_id("org_1").await.unwrap().unwrap();
        assert_eq!(org.name, "Acme");

        let deleted = json!({"type": "organizationMembership.deleted", "data": {"id": "orgmem_1"}});
        event(deleted.clone()).apply(&store).await.unwrap();
        event(deleted).apply(&store).await.unwrap();
    }

    #[tokio::test]
    async fn user_events_fill_the_profile() {
        let store = MemoryStore::new();
        event(json!({
            "type": "user.created",
            "data": {
                "id": "user_1",
                "email_addresses": [{"email_address": "ada@example.com"}],
                "first_name": "Ada",
                "last_name": "Lovelace",
                "image_url": null
            }
        }))
        .apply(&store)
        .await
        .unwrap();

        let profile = store.get_profile("user_1").await.unwrap().unwrap();
        assert_eq!(profile.email.as_deref(), Some("ada@example.com"));
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert!(!profile.is_admin);
    }
}
