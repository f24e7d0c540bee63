//! Secure-credential backend.
//!
//! A [`CredentialVault`] stores opaque secrets addressed by service, access
//! group, and account. The OS keychain integration is a vault implementation
//! supplied by the embedding application; [`MemoryVault`] is the in-process
//! reference vault. [`CredentialContainer`] archives every form to bytes and
//! stores it under the bucket key as the account name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{CredentialError, CredentialResult};
use crate::medium::{ByteContainer, ByteMedium};

/// Service name used when none is configured.
pub const DEFAULT_SERVICE: &str = "storage";

/// Which vault items a container addresses.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub service: String,
    pub access_group: Option<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE.to_string(),
            access_group: None,
        }
    }
}

/// A secure secret store.
///
/// Errors are distinct from absence: a missing item is `Ok(None)`, while a
/// locked or failing vault is `Err`.
pub trait CredentialVault: Send + Sync {
    /// Read the secret for `account`.
    fn get_data(&self, scope: &VaultConfig, account: &str) -> CredentialResult<Option<Vec<u8>>>;

    /// Create or update the secret for `account`.
    fn set_data(&self, scope: &VaultConfig, account: &str, data: &[u8]) -> CredentialResult<()>;

    /// Delete the secret for `account`. Deleting a missing item succeeds.
    fn remove_value(&self, scope: &VaultConfig, account: &str) -> CredentialResult<()>;

    /// Delete every secret in `scope`.
    fn remove_all_values(&self, scope: &VaultConfig) -> CredentialResult<()>;
}

type ItemId = (String, Option<String>, String);

/// In-process vault. Can be locked to simulate an unavailable keychain.
#[derive(Debug, Default)]
pub struct MemoryVault {
    items: RwLock<HashMap<ItemId, Vec<u8>>>,
    locked: RwLock<bool>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every operation until [`MemoryVault::unlock`].
    pub fn lock(&self) {
        *self.locked.write().expect("lock poisoned") = true;
    }

    pub fn unlock(&self) {
        *self.locked.write().expect("lock poisoned") = false;
    }

    /// Number of items across all scopes.
    pub fn len(&self) -> usize {
        self.items.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_unlocked(&self) -> CredentialResult<()> {
        if *self.locked.read().expect("lock poisoned") {
            return Err(CredentialError::Unhandled {
                message: "vault is locked".into(),
            });
        }
        Ok(())
    }

    fn item_id(scope: &VaultConfig, account: &str) -> ItemId {
        (
            scope.service.clone(),
            scope.access_group.clone(),
            account.to_string(),
        )
    }
}

impl CredentialVault for MemoryVault {
    fn get_data(&self, scope: &VaultConfig, account: &str) -> CredentialResult<Option<Vec<u8>>> {
        self.check_unlocked()?;
        let items = self.items.read().expect("lock poisoned");
        Ok(items.get(&Self::item_id(scope, account)).cloned())
    }

    fn set_data(&self, scope: &VaultConfig, account: &str, data: &[u8]) -> CredentialResult<()> {
        self.check_unlocked()?;
        if data.is_empty() {
            return Err(CredentialError::DataConversion);
        }
        let mut items = self.items.write().expect("lock poisoned");
        items.insert(Self::item_id(scope, account), data.to_vec());
        Ok(())
    }

    fn remove_value(&self, scope: &VaultConfig, account: &str) -> CredentialResult<()> {
        self.check_unlocked()?;
        let mut items = self.items.write().expect("lock poisoned");
        items.remove(&Self::item_id(scope, account));
        Ok(())
    }

    fn remove_all_values(&self, scope: &VaultConfig) -> CredentialResult<()> {
        self.check_unlocked()?;
        let mut items = self.items.write().expect("lock poisoned");
        items.retain(|(service, group, _), _| {
            service != &scope.service || group != &scope.access_group
        });
        Ok(())
    }
}

/// A vault narrowed to one service and access group.
#[derive(Clone)]
pub struct Keychain {
    scope: VaultConfig,
    vault: Arc<dyn CredentialVault>,
}

impl Keychain {
    pub fn new(scope: VaultConfig, vault: Arc<dyn CredentialVault>) -> Self {
        Self { scope, vault }
    }

    pub fn scope(&self) -> &VaultConfig {
        &self.scope
    }

    pub fn get_data(&self, key: &str) -> CredentialResult<Option<Vec<u8>>> {
        self.vault.get_data(&self.scope, key)
    }

    pub fn set_data(&self, key: &str, data: &[u8]) -> CredentialResult<()> {
        trace!(service = %self.scope.service, key, len = data.len(), "vault write");
        self.vault.set_data(&self.scope, key, data)
    }

    pub fn remove_value(&self, key: &str) -> CredentialResult<()> {
        self.vault.remove_value(&self.scope, key)
    }

    pub fn remove_all_values(&self) -> CredentialResult<()> {
        self.vault.remove_all_values(&self.scope)
    }
}

impl ByteMedium for Keychain {
    const NAME: &'static str = "credential";
    type Error = CredentialError;

    fn load(&self, key: &str) -> CredentialResult<Option<Vec<u8>>> {
        self.get_data(key)
    }

    fn store(&self, key: &str, bytes: &[u8]) -> CredentialResult<()> {
        self.set_data(key, bytes)
    }

    fn erase(&self, key: &str) -> CredentialResult<()> {
        self.remove_value(key)
    }

    fn erase_all(&self) -> CredentialResult<()> {
        self.remove_all_values()
    }

    fn contains(&self, key: &str) -> CredentialResult<bool> {
        Ok(self.get_data(key)?.is_some())
    }
}

impl std::fmt::Debug for Keychain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keychain").field("scope", &self.scope).finish()
    }
}

/// Credential vault exposed as a [`Container`](stow_container::Container).
pub type CredentialContainer = ByteContainer<Keychain>;

impl ByteContainer<Keychain> {
    /// A container over `vault`, scoped by `scope`.
    pub fn new(scope: VaultConfig, vault: Arc<dyn CredentialVault>) -> Self {
        Self::from_medium(Keychain::new(scope, vault))
    }

    /// The default service over a fresh in-process vault.
    pub fn in_memory() -> Self {
        Self::new(VaultConfig::default(), Arc::new(MemoryVault::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stow_container::Container;
    use stow_types::Value;

    fn container_with_vault() -> (Arc<MemoryVault>, CredentialContainer) {
        let vault = Arc::new(MemoryVault::new());
        let container = CredentialContainer::new(VaultConfig::default(), vault.clone());
        (vault, container)
    }

    // -----------------------------------------------------------------------
    // Typed pairs go through archives
    // -----------------------------------------------------------------------

    #[test]
    fn collection_round_trip() {
        let (vault, c) = container_with_vault();
        let phones = vec![Value::String("555-0100".into())];
        c.set_collection("phones", Some(phones.clone()));
        assert_eq!(c.get_collection("phones"), Some(phones));
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn codable_round_trip() {
        let (_, c) = container_with_vault();
        let json = serde_json::json!({"token": "abc"});
        c.set_codable("session", Some(json.clone()));
        assert_eq!(c.get_codable("session"), Some(json));
    }

    #[test]
    fn none_removes_item() {
        let (vault, c) = container_with_vault();
        c.set_scalar("pin", Some(Value::Integer(1234)));
        assert!(c.exists("pin"));
        c.set_scalar("pin", None);
        assert!(!c.exists("pin"));
        assert!(vault.is_empty());
    }

    // -----------------------------------------------------------------------
    // Vault failures read as absent
    // -----------------------------------------------------------------------

    #[test]
    fn locked_vault_reads_absent_and_drops_writes() {
        let (vault, c) = container_with_vault();
        assert!(c.set_scalar("pin", Some(Value::Integer(1))));
        vault.lock();
        assert_eq!(c.get_scalar("pin"), None);
        assert!(!c.exists("pin"));
        assert!(!c.set_scalar("pin", Some(Value::Integer(2))));
        assert!(!c.set_codable("token", Some(serde_json::json!("abc"))));
        vault.unlock();
        assert_eq!(c.get_scalar("pin"), Some(Value::Integer(1)));
    }

    #[test]
    fn fallible_api_reports_errors() {
        let (vault, c) = container_with_vault();
        vault.lock();
        let err = c.medium().get_data("pin").unwrap_err();
        assert!(matches!(err, CredentialError::Unhandled { .. }));
        vault.unlock();
        let err = c.medium().set_data("pin", &[]).unwrap_err();
        assert!(matches!(err, CredentialError::DataConversion));
    }

    #[test]
    fn scopes_are_isolated() {
        let vault: Arc<dyn CredentialVault> = Arc::new(MemoryVault::new());
        let a = CredentialContainer::new(VaultConfig::default(), vault.clone());
        let b = CredentialContainer::new(
            VaultConfig {
                service: "other".into(),
                access_group: None,
            },
            vault,
        );
        a.set_scalar("k", Some(Value::Bool(true)));
        assert!(!b.exists("k"));
        b.set_scalar("k", Some(Value::Bool(false)));
        a.remove_all();
        assert!(!a.exists("k"));
        assert_eq!(b.get_scalar("k"), Some(Value::Bool(false)));
    }
}
