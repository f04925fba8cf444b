/// Shared registry of discovered bulbs, keyed by device id.
///
/// Last-writer-wins per key. Devices are never evicted: a bulb that
/// stops announcing stays in the registry until the process exits.

use std::collections::HashMap;

use tokio::sync::RwLock;

use lumen_protocol::announcement::DeviceRecord;

#[derive(Default)]
pub struct Registry {
    devices: RwLock<HashMap<String, DeviceRecord>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record under its device id.
    /// Returns `true` if the id was not seen before.
    pub async fn upsert(&self, record: DeviceRecord) -> bool {
        let mut devices = self.devices.write().await;
        devices.insert(record.id.clone(), record).is_none()
    }

    pub async fn get(&self, id: &str) -> Option<DeviceRecord> {
        self.devices.read().await.get(id).cloned()
    }

    /// Clone of the current contents, for readers that outlive the lock.
    pub async fn snapshot(&self) -> HashMap<String, DeviceRecord> {
        self.devices.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.devices.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(id: &str, power: &str) -> DeviceRecord {
        DeviceRecord {
            id: id.to_string(),
            location: "yeelight://192.168.1.9:55443".to_string(),
            server: "posix upnp/1.0 yglc/1".to_string(),
            model: "color4".to_string(),
            fw_ver: "18".to_string(),
            support: vec!["get_prop".to_string(), "set_power".to_string()],
            power: power.to_string(),
            bright: "5".to_string(),
            color_mode: "2".to_string(),
            ct: 5307,
            rgb: 16737792,
            hue: 24,
            sat: 100,
            name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let registry = Registry::new();

        assert!(registry.upsert(record("0xabc", "on")).await);
        assert!(!registry.upsert(record("0xabc", "off")).await);

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.get("0xabc").await.unwrap().power, "off");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_all_visible() {
        const WRITERS: usize = 32;
        let registry = Arc::new(Registry::new());

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    registry.upsert(record(&format!("0x{i:08x}"), "on")).await;
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, WRITERS);
        let snapshot = registry.snapshot().await;
        for i in 0..WRITERS {
            assert!(snapshot.contains_key(&format!("0x{i:08x}")));
        }
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let registry = Registry::new();
        registry.upsert(record("0xabc", "on")).await;

        let snapshot = registry.snapshot().await;
        registry.upsert(record("0xdef", "off")).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len().await, 2);
    }
}
