//! Timezone options: async provider and selection state

use crate::error::{CoreError, CoreResult};
use crate::models::TimezoneOption;
use async_trait::async_trait;
use std::time::Duration;

/// Source of the selectable timezone list
#[async_trait]
pub trait TimezoneProvider: Send + Sync {
    /// Fetch the ordered option list
    async fn fetch_timezones(&self) -> CoreResult<Vec<TimezoneOption>>;
}

/// Built-in provider returning a fixed zone list after a short delay
///
/// Stands in for a real timezone service; the latency mimics one.
#[derive(Debug, Default)]
pub struct MockTimezoneProvider;

impl MockTimezoneProvider {
    const LATENCY_MS: u64 = 300;
}

#[async_trait]
impl TimezoneProvider for MockTimezoneProvider {
    async fn fetch_timezones(&self) -> CoreResult<Vec<TimezoneOption>> {
        tokio::time::sleep(Duration::from_millis(Self::LATENCY_MS)).await;

        let zones = [
            ("Asia/Calcutta", "Asia/Calcutta (GMT+5:30)"),
            ("Asia/Dubai", "Asia/Dubai (GMT+4)"),
            ("Europe/Moscow", "Europe/Moscow (GMT+3)"),
            ("Europe/London", "Europe/London (GMT+0/+1)"),
            ("America/New_York", "America/New_York (GMT-5/-4)"),
            ("America/Los_Angeles", "America/Los_Angeles (GMT-8/-7)"),
            ("Asia/Tokyo", "Asia/Tokyo (GMT+9)"),
        ];

        Ok(zones
            .iter()
            .map(|(value, label)| TimezoneOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect())
    }
}

/// Selectable timezone list plus the current selection
///
/// Seeded with a single default entry; replaced once the provider
/// resolves. The selection survives the replacement when its id is still
/// present, otherwise it falls back to the configured default.
#[derive(Debug, Clone)]
pub struct TimezoneState {
    options: Vec<TimezoneOption>,
    selected: String,
    default_zone: String,
}

impl TimezoneState {
    /// Seed with the single default entry
    pub fn new(default_zone: &str) -> Self {
        Self {
            options: vec![TimezoneOption {
                value: default_zone.to_string(),
                label: format!("{} (Default)", default_zone),
            }],
            selected: default_zone.to_string(),
            default_zone: default_zone.to_string(),
        }
    }

    /// Current option list
    pub fn options(&self) -> &[TimezoneOption] {
        &self.options
    }

    /// Currently selected zone id
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Replace the option list, preserving the selection where possible
    pub fn replace_options(&mut self, zones: Vec<TimezoneOption>) {
        if zones.is_empty() {
            log::warn!("Ignoring empty timezone list");
            return;
        }
        if !zones.iter().any(|z| z.value == self.selected) {
            self.selected = self.default_zone.clone();
        }
        self.options = zones;
    }

    /// Select a zone from the current list
    pub fn select(&mut self, zone: &str) -> CoreResult<()> {
        if !self.options.iter().any(|z| z.value == zone) {
            return Err(CoreError::UnknownTimezone { zone: zone.to_string() });
        }
        self.selected = zone.to_string();
        Ok(())
    }
}

// ==================== Tests ====================
