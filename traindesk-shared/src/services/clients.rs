/// Client registry
///
/// Clients belong to exactly one trainer; every operation is scoped by the
/// caller's `AuthContext`.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::require_not_blank;
use crate::{
    auth::middleware::AuthContext,
    error::{ServiceError, ServiceResult},
    models::client::Client,
};

/// Input for creating a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateClientInput {
    pub first_name: String,
    pub last_name: String,
}

impl CreateClientInput {
    /// Both names must be non-blank
    pub fn validate(&self) -> ServiceResult<()> {
        let mut errors = Vec::new();
        require_not_blank(&mut errors, "first_name", &self.first_name);
        require_not_blank(&mut errors, "last_name", &self.last_name);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(errors))
        }
    }
}

/// Public view of a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

impl From<Client> for ClientSummary {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
        }
    }
}

/// Creates a client owned by the caller
///
/// Names are stored trimmed.
pub async fn create_client(
    pool: &PgPool,
    auth: &AuthContext,
    input: CreateClientInput,
) -> ServiceResult<ClientSummary> {
    input.validate()?;

    let client = Client::create(
        pool,
        auth.trainer_id,
        input.first_name.trim(),
        input.last_name.trim(),
    )
    .await?;

    info!(trainer_id = %auth.trainer_id, client_id = %client.id, "Client created");
    Ok(client.into())
}

/// Lists the caller's clients, ordered by last name then first name
pub async fn list_clients(pool: &PgPool, auth: &AuthContext) -> ServiceResult<Vec<ClientSummary>> {
    let clients = Client::list_by_owner(pool, auth.trainer_id).await?;

    debug!(trainer_id = %auth.trainer_id, count = clients.len(), "Listed clients");
    Ok(clients.into_iter().map(ClientSummary::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_input_valid() {
        let input = CreateClientInput {
            first_name: "Bob".to_string(),
            last_name: "Stone".to_string(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_client_input_blank_names() {
        let input = CreateClientInput {
            first_name: " ".to_string(),
            last_name: String::new(),
        };

        match input.validate() {
            Err(ServiceError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["first_name", "last_name"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_client_input_missing_field_defaults_empty() {
        let input: CreateClientInput = serde_json::from_str(r#"{"first_name":"Bob"}"#).unwrap();
        assert!(matches!(input.validate(), Err(ServiceError::Validation(_))));
    }
}
