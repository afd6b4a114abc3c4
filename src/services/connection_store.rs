//! Brokerage connection registry.

use crate::error::{DeskError, Result};
use crate::services::ids::IdGenerator;
use crate::types::{BrokerageConnection, ConnectionDraft, Credentials};
use tracing::info;

/// Registered brokerage connections, in insertion order.
pub struct ConnectionStore {
    connections: Vec<BrokerageConnection>,
    ids: Box<dyn IdGenerator>,
}

impl ConnectionStore {
    pub fn new(connections: Vec<BrokerageConnection>, ids: Box<dyn IdGenerator>) -> Self {
        Self { connections, ids }
    }

    pub fn list_connections(&self) -> &[BrokerageConnection] {
        &self.connections
    }

    pub fn get(&self, id: &str) -> Option<&BrokerageConnection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// Register a new connection. It always starts `Disconnected`.
    ///
    /// The draft's password is not stored; it comes back in the returned
    /// credentials for the caller to hand to an authenticator.
    pub fn add_connection(&mut self, draft: ConnectionDraft) -> (String, Credentials) {
        let id = loop {
            let id = self.ids.next_id();
            if self.get(&id).is_none() {
                break id;
            }
        };

        let (connection, credentials) = draft.into_parts(id.clone());
        info!(
            "Registered {} connection {} for {}",
            connection.firm, id, connection.username
        );
        self.connections.push(connection);
        (id, credentials)
    }

    /// Remove a connection by id. There is no activity guard.
    pub fn remove_connection(&mut self, id: &str) -> Result<BrokerageConnection> {
        let idx = self
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DeskError::ConnectionNotFound(id.to_string()))?;
        let removed = self.connections.remove(idx);
        info!("Removed {} connection {}", removed.firm, id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ids::SequentialIds;
    use crate::services::seed::seed_connections;
    use crate::types::{ConnectionStatus, Password};

    fn store() -> ConnectionStore {
        ConnectionStore::new(seed_connections(), Box::new(SequentialIds::new("c-")))
    }

    #[test]
    fn test_add_connection_disconnected() {
        let mut store = store();
        let (id, credentials) = store.add_connection(ConnectionDraft {
            username: "trader2".into(),
            account_number: "777".into(),
            password: Password::new("secret"),
            ..Default::default()
        });

        assert_eq!(id, "c-1");
        assert_eq!(credentials.password.expose_secret(), "secret");
        let stored = store.get(&id).unwrap();
        assert_eq!(stored.status, ConnectionStatus::Disconnected);
        assert_eq!(store.list_connections().len(), 2);
    }

    #[test]
    fn test_remove_connected_allowed() {
        let mut store = store();
        let removed = store.remove_connection("1").unwrap();
        assert_eq!(removed.status, ConnectionStatus::Connected);
        assert!(store.list_connections().is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut store = store();
        assert_eq!(
            store.remove_connection("42"),
            Err(DeskError::ConnectionNotFound("42".into()))
        );
        assert_eq!(store.list_connections().len(), 1);
    }
}
