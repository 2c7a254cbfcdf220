use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WALLET_ADDRESS: Regex = Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap();
}

/// Connection state of the player's wallet, as reported by the host.
pub trait IdentityProvider: Send + Sync {
    fn is_connected(&self) -> bool;
    fn address(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletIdentity {
    address: Option<String>,
}

impl WalletIdentity {
    pub fn disconnected() -> Self {
        Self::default()
    }

    /// Accepts `0x` followed by 40 hex digits; anything else is treated as no
    /// wallet at all. Addresses are normalized to lowercase.
    pub fn from_address(raw: &str) -> Self {
        let trimmed = raw.trim();
        if WALLET_ADDRESS.is_match(trimmed) {
            Self {
                address: Some(trimmed.to_ascii_lowercase()),
            }
        } else {
            Self::disconnected()
        }
    }
}

impl IdentityProvider for WalletIdentity {
    fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}
