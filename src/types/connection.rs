/**
 * Brokerage Connection Types
 *
 * Registered links to brokerage accounts. Connections are placeholders: the
 * dashboard never authenticates them itself.
 */

use crate::error::DeskError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Brokerage firm. Closed set of supported firms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Firm {
    #[default]
    Tastytrade,
}

impl Firm {
    /// All supported firms, in display order.
    pub fn all() -> &'static [Firm] {
        &[Firm::Tastytrade]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Firm::Tastytrade => "Tastytrade",
        }
    }
}

impl fmt::Display for Firm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Firm {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Firm::all()
            .iter()
            .copied()
            .find(|firm| firm.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DeskError::UnknownFirm(s.to_string()))
    }
}

/// Connection status. Only ever set by the system, never by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// A registered brokerage account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerageConnection {
    pub id: String,
    pub firm: Firm,
    pub username: String,
    pub account_number: String,
    pub status: ConnectionStatus,
}

/// Password text held in a [`SecretString`].
///
/// Never printed by `Debug` and zeroed on drop.
pub struct Password(SecretString);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    /// Expose the password for the authenticator.
    ///
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.expose_secret().is_empty()
    }
}

impl Clone for Password {
    fn clone(&self) -> Self {
        Self::new(self.expose_secret())
    }
}

impl Default for Password {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for Password {}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

/// Login handed to the external authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

/// Form input for a new connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionDraft {
    pub firm: Firm,
    pub username: String,
    pub account_number: String,
    pub password: Password,
}

impl ConnectionDraft {
    /// Split the draft into the stored entity and the credentials.
    ///
    /// The entity always starts `Disconnected`; the password only travels in
    /// the returned [`Credentials`].
    pub fn into_parts(self, id: String) -> (BrokerageConnection, Credentials) {
        let connection = BrokerageConnection {
            id,
            firm: self.firm,
            username: self.username.clone(),
            account_number: self.account_number,
            status: ConnectionStatus::Disconnected,
        };
        let credentials = Credentials {
            username: self.username,
            password: self.password,
        };
        (connection, credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firm_parse() {
        assert_eq!("Tastytrade".parse::<Firm>().unwrap(), Firm::Tastytrade);
        assert_eq!(" tastytrade ".parse::<Firm>().unwrap(), Firm::Tastytrade);
        assert!(matches!("Robinhood".parse::<Firm>(), Err(DeskError::UnknownFirm(_))));
    }

    #[test]
    fn test_password_redacted() {
        let draft = ConnectionDraft {
            username: "trader2".to_string(),
            password: Password::new("hunter2"),
            ..Default::default()
        };
        let debug = format!("{:?}", draft);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_password_clone_and_default() {
        let password = Password::new("hunter2");
        let copy = password.clone();
        assert_eq!(copy.expose_secret(), "hunter2");
        assert_eq!(copy, password);
        assert!(Password::default().is_empty());
        assert_eq!(format!("{:?}", copy), "Password([REDACTED])");
    }

    #[test]
    fn test_into_parts_forces_disconnected() {
        let draft = ConnectionDraft {
            firm: Firm::Tastytrade,
            username: "trader2".to_string(),
            account_number: "555".to_string(),
            password: Password::new("pw"),
        };
        let (connection, credentials) = draft.into_parts("c-1".to_string());
        assert_eq!(connection.status, ConnectionStatus::Disconnected);
        assert_eq!(connection.username, "trader2");
        assert_eq!(credentials.password.expose_secret(), "pw");

        let json = serde_json::to_string(&connection).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"accountNumber\":\"555\""));
    }
}
