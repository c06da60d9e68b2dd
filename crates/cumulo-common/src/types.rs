//! Domain primitive types used across the Cumulo workspace.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{LOGICAL_ID_HASH_LENGTH, MAX_LOGICAL_ID_LENGTH};
use crate::error::{CumuloError, Result};

/// Logical identifier of a resource within a provisioning template.
///
/// Logical IDs are restricted to ASCII alphanumerics and must be unique
/// within a stack. IDs derived from a construct path carry a short hash
/// suffix so that nested resources with the same local name never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LogicalId(String);

impl LogicalId {
    /// Creates a logical ID from a literal string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, longer than 255 characters,
    /// or contains anything other than ASCII alphanumerics.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > MAX_LOGICAL_ID_LENGTH {
            return Err(CumuloError::Config {
                message: format!("logical ID must be 1-{MAX_LOGICAL_ID_LENGTH} characters: {id:?}"),
            });
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CumuloError::Config {
                message: format!("logical ID must be ASCII alphanumeric: {id:?}"),
            });
        }
        Ok(Self(id))
    }

    /// Derives a logical ID from a construct path.
    ///
    /// The ID is the concatenation of the path segments with non-alphanumeric
    /// characters stripped, followed by the first eight hex characters of the
    /// SHA-256 digest of the path. The same path always yields the same ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty or contains no alphanumeric
    /// characters at all.
    pub fn from_path(segments: &[&str]) -> Result<Self> {
        if segments.is_empty() {
            return Err(CumuloError::Config {
                message: "logical ID path must not be empty".to_string(),
            });
        }
        let mut concatenated: String = segments
            .iter()
            .flat_map(|segment| segment.chars())
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if concatenated.is_empty() {
            return Err(CumuloError::Config {
                message: format!("logical ID path has no alphanumeric characters: {segments:?}"),
            });
        }
        concatenated.truncate(MAX_LOGICAL_ID_LENGTH - LOGICAL_ID_HASH_LENGTH);

        let digest = Sha256::digest(segments.join("/").as_bytes());
        let mut suffix = String::with_capacity(LOGICAL_ID_HASH_LENGTH);
        for byte in digest.iter().take(LOGICAL_ID_HASH_LENGTH / 2) {
            suffix.push_str(&format!("{byte:02X}"));
        }

        Ok(Self(format!("{concatenated}{suffix}")))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified DNS name without the trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainName(String);

impl DomainName {
    /// Creates a domain name, accepting an optional trailing dot.
    ///
    /// Names are case-insensitive and stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, exceeds 253 characters, has
    /// fewer than two labels, or contains a label that is empty, longer
    /// than 63 characters, contains characters outside ASCII alphanumerics
    /// and hyphens, or starts or ends with a hyphen.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into().to_ascii_lowercase();
        let trimmed = name.strip_suffix('.').unwrap_or(&name);
        if trimmed.is_empty() || trimmed.len() > 253 {
            return Err(CumuloError::Config {
                message: format!("domain name must be 1-253 characters: {name:?}"),
            });
        }
        if !trimmed.contains('.') {
            return Err(CumuloError::Config {
                message: format!("domain name must have at least two labels: {name:?}"),
            });
        }
        for label in trimmed.split('.') {
            let valid = !label.is_empty()
                && label.len() <= 63
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && !label.starts_with('-')
                && !label.ends_with('-');
            if !valid {
                return Err(CumuloError::Config {
                    message: format!("invalid DNS label {label:?} in domain name {name:?}"),
                });
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns whether this name equals `zone` or is a name inside it.
    #[must_use]
    pub fn is_within(&self, zone: &Self) -> bool {
        self.0 == zone.0 || self.0.ends_with(&format!(".{}", zone.0))
    }

    /// Returns the name without a trailing dot.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the absolute form of the name, with a trailing dot.
    #[must_use]
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// IPv4 network range in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CidrBlock {
    addr: Ipv4Addr,
    prefix: u8,
}

impl CidrBlock {
    /// Creates a CIDR block from a network address and prefix length.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix exceeds 32 or the address has host
    /// bits set below the prefix.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Self> {
        if prefix > 32 {
            return Err(CumuloError::Config {
                message: format!("CIDR prefix must be 0-32: /{prefix}"),
            });
        }
        let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
        if u32::from(addr) & mask != u32::from(addr) {
            return Err(CumuloError::Config {
                message: format!("CIDR address {addr}/{prefix} has host bits set"),
            });
        }
        Ok(Self { addr, prefix })
    }

    /// Returns the network address.
    #[must_use]
    pub const fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    /// Returns the prefix length.
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Carves `count` consecutive subnets of `new_prefix` out of this block,
    /// starting at the network address.
    ///
    /// # Errors
    ///
    /// Returns an error if `new_prefix` is not between this block's prefix
    /// and 32, or if the block cannot hold `count` subnets of that size.
    pub fn subnets(&self, new_prefix: u8, count: usize) -> Result<Vec<Self>> {
        if new_prefix < self.prefix || new_prefix > 32 {
            return Err(CumuloError::Config {
                message: format!(
                    "subnet prefix /{new_prefix} must be between /{} and /32",
                    self.prefix
                ),
            });
        }
        let available = 1u64 << (new_prefix - self.prefix);
        if count as u64 > available {
            return Err(CumuloError::Config {
                message: format!(
                    "{self} holds only {available} subnets of size /{new_prefix}, {count} requested"
                ),
            });
        }
        let step = 1u64 << (32 - new_prefix);
        let base = u64::from(u32::from(self.addr));
        let mut blocks = Vec::with_capacity(count);
        for index in 0..count as u64 {
            let addr = Ipv4Addr::from(u32::try_from(base + index * step).map_err(|_| {
                CumuloError::Config {
                    message: format!("subnet {index} of {self} overflows the IPv4 address space"),
                }
            })?);
            blocks.push(Self {
                addr,
                prefix: new_prefix,
            });
        }
        Ok(blocks)
    }
}

impl FromStr for CidrBlock {
    type Err = CumuloError;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, prefix) = s.split_once('/').ok_or_else(|| CumuloError::Config {
            message: format!("CIDR block must be <address>/<prefix>: {s:?}"),
        })?;
        let addr: Ipv4Addr = addr.parse().map_err(|_| CumuloError::Config {
            message: format!("invalid IPv4 address in CIDR block: {s:?}"),
        })?;
        let prefix: u8 = prefix.parse().map_err(|_| CumuloError::Config {
            message: format!("invalid prefix length in CIDR block: {s:?}"),
        })?;
        Self::new(addr, prefix)
    }
}

impl fmt::Display for CidrBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}
