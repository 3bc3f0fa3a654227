// libs/schedule-cell/src/store/mod.rs
use async_trait::async_trait;

use shared_database::StoreError;

use crate::models::ScheduleConfiguration;

pub mod memory;
pub mod supabase;

pub use memory::InMemoryScheduleStore;
pub use supabase::SupabaseScheduleStore;

/// Persistence for the clinic's single schedule configuration.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn load(&self) -> Result<Option<ScheduleConfiguration>, StoreError>;

    async fn save(&self, config: &ScheduleConfiguration) -> Result<(), StoreError>;
}
