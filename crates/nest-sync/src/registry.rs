use async_trait::async_trait;
use nest_config::{now_millis, Meta, ModuleRef, DEFAULT_IGNORE};
use tracing::debug;

use crate::error::SyncResult;
use crate::types::RemoteConfig;

/// Config endpoints of the module registry.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn download_config(&self, module: &ModuleRef) -> SyncResult<RemoteConfig>;
    async fn upload_config(
        &self,
        module: &ModuleRef,
        meta: &Meta,
        ignore: &str,
        token: &str,
    ) -> SyncResult<()>;
}

/// Stand-in until the registry exposes config endpoints.
///
/// Every download returns an empty config last synced a little over
/// sixteen minutes ago; uploads are accepted and dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaceholderRegistry;

const PLACEHOLDER_AGE_MS: i64 = 1_000_000;

#[async_trait]
impl RegistryApi for PlaceholderRegistry {
    async fn download_config(&self, module: &ModuleRef) -> SyncResult<RemoteConfig> {
        debug!(%module, "placeholder config download");
        Ok(RemoteConfig {
            meta: Meta::default(),
            ignore: DEFAULT_IGNORE.to_string(),
            last_sync: now_millis() - PLACEHOLDER_AGE_MS,
        })
    }

    async fn upload_config(
        &self,
        module: &ModuleRef,
        _meta: &Meta,
        _ignore: &str,
        _token: &str,
    ) -> SyncResult<()> {
        debug!(%module, "placeholder config upload");
        Ok(())
    }
}
