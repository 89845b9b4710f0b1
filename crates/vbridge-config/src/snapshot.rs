//! Startup snapshot and restart-needed evaluation.
//!
//! # Design
//! - The snapshot is captured once, right after the store is seeded, and is
//!   never mutated; it records what the running bridge actually uses.
//! - Evaluation compares the snapshot with fresh store reads and has no side
//!   effects.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::SettingName;
use crate::store::PortConfigStore;

/// Values of every managed setting at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeValues {
    /// Single UDP port for multiplexed media.
    pub single_port: i32,
    /// Lower bound of the fallback UDP port range.
    pub min_port: i32,
    /// Upper bound of the fallback UDP port range.
    pub max_port: i32,
    /// Whether RTP over TCP is allowed.
    pub tcp_enabled: bool,
    /// TCP port, `None` when unset.
    pub tcp_port: Option<i32>,
}

impl RuntimeValues {
    /// Settings whose value differs between `self` and `other`.
    #[must_use]
    pub fn differing(&self, other: &Self) -> Vec<SettingName> {
        let checks = [
            (SettingName::SinglePort, self.single_port != other.single_port),
            (SettingName::MinPort, self.min_port != other.min_port),
            (SettingName::MaxPort, self.max_port != other.max_port),
            (SettingName::DisableTcp, self.tcp_enabled != other.tcp_enabled),
            (SettingName::TcpPort, self.tcp_port != other.tcp_port),
        ];
        checks
            .into_iter()
            .filter_map(|(name, differs)| differs.then_some(name))
            .collect()
    }
}

/// Immutable record of the values in effect since activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupSnapshot {
    values: RuntimeValues,
    captured_at: DateTime<Utc>,
}

impl StartupSnapshot {
    /// Capture the store's current values.
    #[must_use]
    pub fn capture(store: &PortConfigStore) -> Self {
        Self {
            values: store.current(),
            captured_at: Utc::now(),
        }
    }

    /// Values recorded at capture time.
    #[must_use]
    pub const fn values(&self) -> &RuntimeValues {
        &self.values
    }

    /// When the snapshot was taken.
    #[must_use]
    pub const fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }
}

/// Reports whether pending configuration requires a restart.
#[derive(Debug, Clone)]
pub struct RestartEvaluator {
    snapshot: Arc<StartupSnapshot>,
    store: PortConfigStore,
}

impl RestartEvaluator {
    /// Pair a snapshot with the live store it should be compared against.
    #[must_use]
    pub const fn new(snapshot: Arc<StartupSnapshot>, store: PortConfigStore) -> Self {
        Self { snapshot, store }
    }

    /// `true` when any setting differs from its snapshot value.
    #[must_use]
    pub fn restart_needed(&self) -> bool {
        self.snapshot.values() != &self.store.current()
    }

    /// Settings whose configured value differs from the value in effect.
    #[must_use]
    pub fn pending_changes(&self) -> Vec<SettingName> {
        self.snapshot.values().differing(&self.store.current())
    }

    /// Snapshot the evaluator compares against.
    #[must_use]
    pub fn snapshot(&self) -> &StartupSnapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{ConfigBackend, MemoryBackend};
    use crate::model::{DISABLE_TCP, MAX_PORT, MIN_PORT, SINGLE_PORT, TCP_PORT};

    fn evaluator(backend: &Arc<MemoryBackend>) -> (PortConfigStore, RestartEvaluator) {
        let store = PortConfigStore::new(backend.clone());
        let snapshot = Arc::new(StartupSnapshot::capture(&store));
        let evaluator = RestartEvaluator::new(snapshot, store.clone());
        (store, evaluator)
    }

    #[test]
    fn fresh_snapshot_needs_no_restart() {
        let backend = Arc::new(MemoryBackend::new());
        let (_, evaluator) = evaluator(&backend);
        assert!(!evaluator.restart_needed());
        assert!(evaluator.pending_changes().is_empty());
        assert_eq!(
            *evaluator.snapshot().values(),
            RuntimeValues {
                single_port: 10_000,
                min_port: 10_001,
                max_port: 20_000,
                tcp_enabled: true,
                tcp_port: None,
            }
        );
    }

    #[test]
    fn any_single_change_needs_restart() -> anyhow::Result<()> {
        let cases = [
            (&SINGLE_PORT, "12000", SettingName::SinglePort),
            (&MIN_PORT, "11000", SettingName::MinPort),
            (&MAX_PORT, "30000", SettingName::MaxPort),
            (&DISABLE_TCP, "true", SettingName::DisableTcp),
            (&TCP_PORT, "4443", SettingName::TcpPort),
        ];
        for (setting, raw, name) in cases {
            let backend = Arc::new(MemoryBackend::new());
            let (store, evaluator) = evaluator(&backend);
            store.set(setting, raw)?;
            assert!(evaluator.restart_needed(), "{name} should need a restart");
            assert_eq!(evaluator.pending_changes(), vec![name]);
        }
        Ok(())
    }

    #[test]
    fn restoring_every_value_clears_restart() -> anyhow::Result<()> {
        let backend = Arc::new(MemoryBackend::new());
        let (store, evaluator) = evaluator(&backend);

        store.set(&SINGLE_PORT, "12000")?;
        store.set(&MAX_PORT, "25000")?;
        assert!(evaluator.restart_needed());

        store.set(&SINGLE_PORT, "10000")?;
        assert!(evaluator.restart_needed());
        assert_eq!(evaluator.pending_changes(), vec![SettingName::MaxPort]);

        store.delete(&MAX_PORT);
        assert!(!evaluator.restart_needed());
        Ok(())
    }

    #[test]
    fn tcp_port_presence_is_compared() -> anyhow::Result<()> {
        let backend = Arc::new(MemoryBackend::with_values([(TCP_PORT.store_key, "4443")]));
        let (store, evaluator) = evaluator(&backend);
        assert_eq!(evaluator.snapshot().values().tcp_port, Some(4443));

        store.set(&TCP_PORT, "4443")?;
        assert!(!evaluator.restart_needed());

        store.set(&TCP_PORT, "5443")?;
        assert!(evaluator.restart_needed());

        store.delete(&TCP_PORT);
        assert!(evaluator.restart_needed());

        backend.set_property(TCP_PORT.store_key, "4443");
        assert!(!evaluator.restart_needed());
        Ok(())
    }

    #[test]
    fn snapshot_serializes_values() -> anyhow::Result<()> {
        let backend = Arc::new(MemoryBackend::new());
        let store = PortConfigStore::new(backend);
        let snapshot = StartupSnapshot::capture(&store);
        let json = serde_json::to_value(&snapshot)?;
        assert_eq!(json["values"]["single_port"], 10_000);
        assert_eq!(json["values"]["tcp_port"], serde_json::Value::Null);
        assert!(json["captured_at"].is_string());
        Ok(())
    }
}
