//! Bionic event log
//!
//! Tracks install/activation/power events for display to the player.
//! Gameplay errors and tick events are surfaced here as in-game messages,
//! never as process-fatal conditions.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::BionicId;

/// Maximum number of entries to keep in the event log
const MAX_EVENT_ENTRIES: usize = 50;

/// Category of bionic event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BionicEventCategory {
    /// Install/uninstall/upgrade of a bionic
    Surgery,
    /// Activation or deactivation
    Activation,
    /// Periodic power draw problems (shutoffs, lapses)
    Power,
    /// Content-integrity warnings surfaced to the player
    Content,
}

impl BionicEventCategory {
    /// Get short label for display
    pub fn label(&self) -> &'static str {
        match self {
            BionicEventCategory::Surgery => "SRG",
            BionicEventCategory::Activation => "ACT",
            BionicEventCategory::Power => "PWR",
            BionicEventCategory::Content => "DAT",
        }
    }
}

/// An event log entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BionicEvent {
    /// Tick when this happened
    pub tick: u64,
    /// Category of event
    pub category: BionicEventCategory,
    /// Bionic involved (if any)
    pub bionic: Option<BionicId>,
    /// Short description
    pub message: String,
}

/// Statistics about logged events
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BionicLogStats {
    pub total_events: u64,
    pub activations: u64,
    pub shutoffs: u64,
}

/// The bionic event log store
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BionicLog {
    entries: VecDeque<BionicEvent>,
    pub stats: BionicLogStats,
}

impl BionicLog {
    pub fn new() -> Self {
        BionicLog {
            entries: VecDeque::with_capacity(MAX_EVENT_ENTRIES),
            stats: BionicLogStats::default(),
        }
    }

    /// Add a new event entry
    pub fn log(&mut self, entry: BionicEvent) {
        self.stats.total_events += 1;
        match entry.category {
            BionicEventCategory::Activation => self.stats.activations += 1,
            BionicEventCategory::Power => self.stats.shutoffs += 1,
            _ => {}
        }

        self.entries.push_back(entry);

        while self.entries.len() > MAX_EVENT_ENTRIES {
            self.entries.pop_front();
        }
    }

    pub fn log_surgery(&mut self, tick: u64, bionic: &BionicId, message: String) {
        self.log(BionicEvent {
            tick,
            category: BionicEventCategory::Surgery,
            bionic: Some(bionic.clone()),
            message,
        });
    }

    pub fn log_activation(&mut self, tick: u64, bionic: &BionicId, message: String) {
        self.log(BionicEvent {
            tick,
            category: BionicEventCategory::Activation,
            bionic: Some(bionic.clone()),
            message,
        });
    }

    pub fn log_power(&mut self, tick: u64, bionic: &BionicId, message: String) {
        self.log(BionicEvent {
            tick,
            category: BionicEventCategory::Power,
            bionic: Some(bionic.clone()),
            message,
        });
    }

    pub fn log_content(&mut self, message: String) {
        self.log(BionicEvent {
            tick: 0,
            category: BionicEventCategory::Content,
            bionic: None,
            message,
        });
    }

    /// Get recent entries (newest first)
    pub fn recent_entries(&self, count: usize) -> Vec<&BionicEvent> {
        self.entries.iter().rev().take(count).collect()
    }

    /// Get entries for a specific bionic
    pub fn entries_for(&self, bionic: &BionicId, count: usize) -> Vec<&BionicEvent> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.bionic.as_ref() == Some(bionic))
            .take(count)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_trims_to_limit() {
        let mut log = BionicLog::new();
        for i in 0..(MAX_EVENT_ENTRIES as u64 + 10) {
            log.log_activation(i, &BionicId::new("bio_nv"), format!("activation {}", i));
        }
        assert_eq!(log.len(), MAX_EVENT_ENTRIES);
        assert_eq!(log.stats.total_events, MAX_EVENT_ENTRIES as u64 + 10);
        // oldest entries dropped first
        assert_eq!(log.recent_entries(1)[0].tick, MAX_EVENT_ENTRIES as u64 + 9);
    }

    #[test]
    fn test_recent_entries_newest_first() {
        let mut log = BionicLog::new();
        log.log_surgery(1, &BionicId::new("bio_a"), "installed".into());
        log.log_surgery(2, &BionicId::new("bio_b"), "installed".into());
        let recent = log.recent_entries(2);
        assert_eq!(recent[0].tick, 2);
        assert_eq!(recent[1].tick, 1);
    }

    #[test]
    fn test_entries_for_filters_by_bionic() {
        let mut log = BionicLog::new();
        log.log_activation(1, &BionicId::new("bio_a"), "on".into());
        log.log_activation(2, &BionicId::new("bio_b"), "on".into());
        log.log_power(3, &BionicId::new("bio_a"), "shut down".into());
        let entries = log.entries_for(&BionicId::new("bio_a"), 10);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].tick, 3);
    }
}
