use async_trait::async_trait;
use tokio::sync::RwLock;

use shared_database::StoreError;

use crate::models::ScheduleConfiguration;
use crate::store::ScheduleStore;

#[derive(Default)]
pub struct InMemoryScheduleStore {
    config: RwLock<Option<ScheduleConfiguration>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(config: ScheduleConfiguration) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn load(&self) -> Result<Option<ScheduleConfiguration>, StoreError> {
        Ok(self.config.read().await.clone())
    }

    async fn save(&self, config: &ScheduleConfiguration) -> Result<(), StoreError> {
        *self.config.write().await = Some(config.clone());
        Ok(())
    }
}
