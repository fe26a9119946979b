//! Per-device comparison result cache.

use dashmap::DashMap;

/// Remembers the last manifest signature compared for each device.
///
/// The signature is the device's raw serialized plugin payload; equality is
/// textual, not semantic. Repeated device events with an unchanged payload
/// (periodic polling) skip the whole comparison pass, so warnings are not
/// reproduced and the local manifest is not re-read until the device's
/// manifest actually changes.
///
/// Instances are caller-owned state, not process-global: the service holds
/// one, and tests can instantiate isolated caches freely. Entries live for
/// the lifetime of the cache; eviction on device disconnect is the
/// connection layer's policy, via [`remove`](Self::remove).
#[derive(Debug, Default)]
pub struct ComparisonCache {
    compared: DashMap<String, String>,
}

impl ComparisonCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a comparison should run for this device and signature.
    ///
    /// True on first sight of a device and whenever the signature differs
    /// from the last one recorded; false when the signature is unchanged.
    pub fn should_compare(&self, device_id: &str, signature: &str) -> bool {
        match self.compared.get(device_id) {
            Some(last) => last.value() != signature,
            None => true,
        }
    }

    /// Record that a comparison ran for this device and signature.
    pub fn mark_compared(&self, device_id: &str, signature: &str) {
        self.compared
            .insert(device_id.to_string(), signature.to_string());
    }

    /// Drop the record for a device, forcing the next event to compare.
    pub fn remove(&self, device_id: &str) {
        self.compared.remove(device_id);
    }

    /// Number of devices with a recorded comparison.
    pub fn len(&self) -> usize {
        self.compared.len()
    }

    /// Check whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.compared.is_empty()
    }
}
