use std::path::Path;
use std::sync::Arc;

use settings::SettingsStore;
use tracing::info;

use crate::policy::register_sections;
use crate::{
    GroupMembership, HostEnvironment, PlatformClassifier, ScopeTable, ServiceError, SpawnAdmin,
    SpawnListener, SpawnResolver, SpawnStore,
};

/// All engine parts wired to one host.
pub struct SpawnService {
    pub settings: Arc<SettingsStore>,
    pub store: Arc<SpawnStore>,
    pub resolver: Arc<SpawnResolver>,
    pub listener: SpawnListener,
    pub admin: SpawnAdmin,
}

impl SpawnService {
    /// Open the settings and spawn files, creating nothing until the first write.
    pub fn open(
        config_file: &Path,
        spawns_file: &Path,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self, ServiceError> {
        let settings = SettingsStore::builder()
            .with_settings_file(config_file)
            .build()?;
        let store = SpawnStore::builder().with_spawn_file(spawns_file).build()?;
        let service = Self::assemble(settings, store, host)?;
        info!(
            "spawn service ready with {} stored spawn entries",
            service.store.len()
        );
        Ok(service)
    }

    /// A service that never touches the disk.
    pub fn in_memory(host: Arc<dyn HostEnvironment>) -> Result<Self, ServiceError> {
        Self::assemble(SettingsStore::in_memory(), SpawnStore::in_memory(), host)
    }

    fn assemble(
        settings: SettingsStore,
        store: SpawnStore,
        host: Arc<dyn HostEnvironment>,
    ) -> Result<Self, ServiceError> {
        register_sections(&settings)?;
        let settings = Arc::new(settings);
        let store = Arc::new(store);

        let table = ScopeTable::new(store.clone(), host.clone());
        let resolver = Arc::new(SpawnResolver::new(
            table.clone(),
            GroupMembership::new(table.clone()),
            PlatformClassifier::new(host.clone()),
            settings.clone(),
        ));
        let listener = SpawnListener::new(resolver.clone(), host.clone());
        let admin = SpawnAdmin::new(table, settings.clone(), host);

        Ok(Self {
            settings,
            store,
            resolver,
            listener,
            admin,
        })
    }
}
