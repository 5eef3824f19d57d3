//! TOML-driven gateway configuration.
//!
//! A `GatewayConfig` names the gateway's deployment identity, the proxy
//! table entries, and the bootstrap ability grants applied at startup.
//! Account and ledger ids are written as `0x`-prefixed hex strings; ability
//! and action-kind names are kebab-case.
//!
//! Example:
//!
//! ```toml
//! gateway = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
//!
//! [[proxies]]
//! kind = "create-asset"
//! proxy = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1"
//! abilities = ["allow-create-asset", "create-asset"]
//!
//! [[proxies]]
//! kind = "transfer-value"
//! proxy = "0xc3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3"
//!
//! [[grants]]
//! ledger = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1"
//! account = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1"
//! abilities = ["allow-create-asset"]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use mandate_contracts::{
    ability::{Abilities, Ability},
    account::{AccountId, LedgerId},
    action::ActionKind,
    error::{MandateError, MandateResult},
};

use crate::{
    proxy::{ProxyEntry, ProxyTable},
    registry::AbilityRegistry,
};

/// One proxy table entry in configuration form.
///
/// An empty (or omitted) `abilities` list declares a consent-authorized
/// kind — the proxy needs no ability grant, only the entry itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// The action kind this proxy executes.
    pub kind: ActionKind,
    /// The proxy account.
    pub proxy: AccountId,
    /// Ability bits of which the proxy must hold at least one on the
    /// target ledger.
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

/// One bootstrap ability grant applied at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantConfig {
    /// The ledger the grant applies to.
    pub ledger: LedgerId,
    /// The account receiving the abilities.
    pub account: AccountId,
    /// The abilities to grant.
    pub abilities: Vec<Ability>,
}

/// The top-level structure deserialized from a TOML gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// The gateway's deployment identity — the first field of every claim
    /// digest issued against it.
    pub gateway: AccountId,
    /// Proxy table entries. A kind with no entry is not executable through
    /// the gateway.
    #[serde(default)]
    pub proxies: Vec<ProxyConfig>,
    /// Ability grants applied before the gateway accepts orders.
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

impl GatewayConfig {
    /// Parse `s` as TOML and build a `GatewayConfig`.
    ///
    /// Returns `MandateError::ConfigError` if the TOML is malformed or does
    /// not match the expected schema.
    pub fn from_toml_str(s: &str) -> MandateResult<Self> {
        let config: GatewayConfig = toml::from_str(s).map_err(|e| MandateError::ConfigError {
            reason: format!("failed to parse gateway TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as TOML gateway configuration.
    pub fn from_file(path: &Path) -> MandateResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MandateError::ConfigError {
            reason: format!("failed to read gateway config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the proxy table declared by this configuration.
    pub fn proxy_table(&self) -> ProxyTable {
        let mut table = ProxyTable::new();
        for entry in &self.proxies {
            let required = if entry.abilities.is_empty() {
                None
            } else {
                Some(entry.abilities.iter().copied().collect::<Abilities>())
            };
            table.insert(
                entry.kind,
                ProxyEntry {
                    proxy: entry.proxy,
                    required,
                },
            );
        }
        table
    }

    /// Apply the bootstrap grants to `registry`.
    ///
    /// Grants are applied with startup authority, before any caller-driven
    /// administration happens — this is the configuration analog of a
    /// ledger owner handing out initial abilities.
    pub fn apply_grants(&self, registry: &AbilityRegistry) {
        for grant in &self.grants {
            let mask: Abilities = grant.abilities.iter().copied().collect();
            let merged = registry.mask_of(grant.ledger, grant.account).union(mask);
            registry.overwrite_mask(grant.ledger, grant.account, merged);
        }
    }

    // ── Internal validation ───────────────────────────────────────────────────

    fn validate(&self) -> MandateResult<()> {
        if self.gateway.is_zero() {
            return Err(MandateError::ConfigError {
                reason: "gateway identity must not be the zero account".to_string(),
            });
        }
        for entry in &self.proxies {
            if entry.proxy.is_zero() {
                return Err(MandateError::ConfigError {
                    reason: format!("proxy for kind '{}' is the zero account", entry.kind),
                });
            }
        }
        for grant in &self.grants {
            if grant.account.is_zero() {
                return Err(MandateError::ConfigError {
                    reason: "grant target must not be the zero account".to_string(),
                });
            }
            if grant.abilities.is_empty() {
                return Err(MandateError::ConfigError {
                    reason: format!("grant for account {} lists no abilities", grant.account),
                });
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use mandate_contracts::{ability::Ability, action::ActionKind, error::MandateError};

    use super::GatewayConfig;

    const SAMPLE: &str = r#"
gateway = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"

[[proxies]]
kind = "create-asset"
proxy = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1"
abilities = ["allow-create-asset", "create-asset"]

[[proxies]]
kind = "transfer-value"
proxy = "0xc3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3c3"

[[grants]]
ledger = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1"
account = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1"
abilities = ["allow-create-asset"]
"#;

    #[test]
    fn sample_config_parses() {
        let config = GatewayConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.proxies.len(), 2);
        assert_eq!(config.grants.len(), 1);

        let table = config.proxy_table();
        let create = table.entry(ActionKind::CreateAsset).unwrap();
        assert!(create.required.unwrap().has(Ability::AllowCreateAsset));

        // An omitted abilities list is a consent-authorized kind.
        let value = table.entry(ActionKind::TransferValue).unwrap();
        assert!(value.required.is_none());

        // No entry was declared for destroy-asset.
        assert!(table.entry(ActionKind::DestroyAsset).is_none());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let result = GatewayConfig::from_toml_str("gateway = 12");
        assert!(matches!(result, Err(MandateError::ConfigError { .. })));
    }

    #[test]
    fn zero_gateway_rejected() {
        let result = GatewayConfig::from_toml_str(
            r#"gateway = "0x0000000000000000000000000000000000000000""#,
        );
        assert!(matches!(result, Err(MandateError::ConfigError { .. })));
    }

    #[test]
    fn unknown_ability_name_rejected() {
        let bad = r#"
gateway = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"

[[grants]]
ledger = "0xa1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1"
account = "0xc1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1c1"
abilities = ["rule-the-world"]
"#;
        assert!(matches!(
            GatewayConfig::from_toml_str(bad),
            Err(MandateError::ConfigError { .. })
        ));
    }
}
