use crate::shared::ids::SecretRef;

pub const AUTH_TYPE_USERNAME_PASSWORD: &str = "UsernamePassword";
pub const AUTH_TYPE_SERVICE_TOKEN: &str = "ServiceToken";

/// Credential mode for a connector. The wire payload always carries all four
/// credential fields; the inactive mode's pair is serialized as explicit
/// nulls so an edit that switches modes clears the stale pair server-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthConfig {
    UsernamePassword {
        username: String,
        password: String,
    },
    ServiceToken {
        client_id: String,
        client_secret_ref: SecretRef,
    },
}

impl AuthConfig {
    pub fn auth_type(&self) -> &'static str {
        match self {
            Self::UsernamePassword { .. } => AUTH_TYPE_USERNAME_PASSWORD,
            Self::ServiceToken { .. } => AUTH_TYPE_SERVICE_TOKEN,
        }
    }

    pub fn secret_ref(&self) -> Option<&SecretRef> {
        match self {
            Self::UsernamePassword { .. } => None,
            Self::ServiceToken {
                client_secret_ref, ..
            } => Some(client_secret_ref),
        }
    }
}
