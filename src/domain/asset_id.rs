//! Asset identifiers: the native asset or a fungible-token contract.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::address::{Address, AddressParseError};

/// Identifies a swappable asset.
///
/// The native asset is addressed by the reserved zero address on the
/// wire, so `"0x0000…0000"` parses to [`AssetId::Native`] and every other
/// address parses to [`AssetId::Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetId {
    /// The chain's base currency.
    Native,
    /// A fungible token identified by its contract address (never zero).
    Token(Address),
}

impl AssetId {
    /// Maps an address to an asset id, treating the zero address as native.
    #[must_use]
    pub fn from_address(address: Address) -> Self {
        if address.is_zero() {
            Self::Native
        } else {
            Self::Token(address)
        }
    }

    /// Returns the wire address of this asset.
    #[must_use]
    pub const fn address(&self) -> Address {
        match self {
            Self::Native => Address::ZERO,
            Self::Token(address) => *address,
        }
    }

    /// Returns `true` for [`AssetId::Native`].
    #[must_use]
    pub const fn is_native(&self) -> bool {
        matches!(self, Self::Native)
    }
}

impl From<Address> for AssetId {
    fn from(address: Address) -> Self {
        Self::from_address(address)
    }
}

impl FromStr for AssetId {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Address>().map(Self::from_address)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

impl Serialize for AssetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Address::deserialize(deserializer).map(Self::from_address)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_native() {
        let parsed = "0x0000000000000000000000000000000000000000".parse::<AssetId>();
        assert_eq!(parsed, Ok(AssetId::Native));
    }

    #[test]
    fn non_zero_address_is_token() {
        let addr = Address::from_bytes([7u8; 20]);
        assert_eq!(AssetId::from(addr), AssetId::Token(addr));
        assert!(!AssetId::from(addr).is_native());
    }

    #[test]
    fn native_displays_as_zero_address() {
        assert_eq!(
            AssetId::Native.to_string(),
            "0x0000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn native_orders_before_tokens() {
        let token = AssetId::Token(Address::from_bytes([1u8; 20]));
        assert!(AssetId::Native < token);
    }

    #[test]
    fn serde_round_trip_through_address_string() {
        let token = AssetId::Token(Address::from_bytes([9u8; 20]));
        let json = serde_json::to_string(&token).unwrap_or_default();
        let back: Result<AssetId, _> = serde_json::from_str(&json);
        assert_eq!(back.ok(), Some(token));
    }
}
