// libs/schedule-cell/src/services/schedule.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::models::{ScheduleConfiguration, ScheduleError};
use crate::services::slots::{self, Slots};
use crate::store::ScheduleStore;

pub struct ScheduleService {
    store: Arc<dyn ScheduleStore>,
}

impl ScheduleService {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store }
    }

    pub async fn get_configuration(&self) -> Result<Option<ScheduleConfiguration>, ScheduleError> {
        self.store.load().await.map_err(|e| {
            error!("Failed to load schedule configuration: {}", e);
            ScheduleError::DatabaseError(e.to_string())
        })
    }

    /// Validates and replaces the stored configuration.
    pub async fn save_configuration(
        &self,
        config: ScheduleConfiguration,
    ) -> Result<ScheduleConfiguration, ScheduleError> {
        config.validate()?;

        self.store.save(&config).await.map_err(|e| {
            error!("Failed to save schedule configuration: {}", e);
            ScheduleError::DatabaseError(e.to_string())
        })?;

        info!(
            "Schedule configuration saved: {} min consults, {} open days",
            config.consult_duration_minutes(),
            config.days().filter(|d| d.is_active).count()
        );
        Ok(config)
    }

    /// Raw slots for `date`; empty when nothing has been configured.
    pub async fn slots_for(&self, date: NaiveDate) -> Result<Slots, ScheduleError> {
        match self.get_configuration().await? {
            Some(config) => slots::generate(&config, date),
            None => {
                debug!("Schedule not configured, no slots for {}", date);
                Ok(Slots::empty())
            }
        }
    }
}
