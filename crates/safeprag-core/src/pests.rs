use crate::model::{DevicePestCount, Pest};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Apply a signed delta to a count, never going below zero.
pub fn apply_delta(count: u32, delta: i64) -> u32 {
    let next = i64::from(count).saturating_add(delta);
    u32::try_from(next.max(0)).unwrap_or(u32::MAX)
}

/// Parse a manually typed count. Empty, negative or unparseable input is 0.
pub fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    raw.parse::<i64>()
        .map(|n| apply_delta(0, n))
        .unwrap_or(0)
}

/// Keep only pests with a positive count.
pub fn filter_positive(pests: &[Pest]) -> Vec<Pest> {
    pests.iter().filter(|p| p.count > 0).cloned().collect()
}

/// Build the persisted entry for one device, or `None` when nothing was counted.
pub fn commit(device_type: &str, device_number: u32, counts: &[Pest]) -> Option<DevicePestCount> {
    let pests = filter_positive(counts);
    if pests.is_empty() {
        return None;
    }
    Some(DevicePestCount {
        device_type: device_type.to_string(),
        device_number,
        pests,
    })
}

/// Per-device pest tallies for the active order.
///
/// Drafts hold every counted pest (zeros included) while the technician is
/// counting; committed entries hold only positive counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestCounter {
    drafts: Vec<DevicePestCount>,
    committed: Vec<DevicePestCount>,
}

impl PestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a counter from previously committed entries.
    pub fn from_committed(committed: Vec<DevicePestCount>) -> Self {
        PestCounter {
            drafts: Vec::new(),
            committed,
        }
    }

    fn draft_mut(&mut self, device_type: &str, device_number: u32) -> &mut DevicePestCount {
        let idx = match self
            .drafts
            .iter()
            .position(|d| d.device_type == device_type && d.device_number == device_number)
        {
            Some(idx) => idx,
            None => {
                // Start from what was committed earlier for this device
                let pests = self
                    .committed
                    .iter()
                    .find(|d| d.device_type == device_type && d.device_number == device_number)
                    .map(|d| d.pests.clone())
                    .unwrap_or_default();
                self.drafts.push(DevicePestCount {
                    device_type: device_type.to_string(),
                    device_number,
                    pests,
                });
                self.drafts.len() - 1
            }
        };
        &mut self.drafts[idx]
    }

    /// Current draft counts for a device.
    pub fn draft(&self, device_type: &str, device_number: u32) -> &[Pest] {
        self.drafts
            .iter()
            .find(|d| d.device_type == device_type && d.device_number == device_number)
            .map(|d| d.pests.as_slice())
            .unwrap_or_default()
    }

    fn update(
        &mut self,
        device_type: &str,
        device_number: u32,
        pest_name: &str,
        f: impl FnOnce(u32) -> u32,
    ) -> &[Pest] {
        let draft = self.draft_mut(device_type, device_number);
        match draft.pests.iter_mut().find(|p| p.name == pest_name) {
            Some(pest) => pest.count = f(pest.count),
            None => draft.pests.push(Pest {
                name: pest_name.to_string(),
                count: f(0),
            }),
        }
        &draft.pests
    }

    /// Add `delta` (possibly negative) to a pest's count on one device.
    pub fn record_count(
        &mut self,
        device_type: &str,
        device_number: u32,
        pest_name: &str,
        delta: i64,
    ) -> &[Pest] {
        self.update(device_type, device_number, pest_name, |c| apply_delta(c, delta))
    }

    /// Overwrite a pest's count from manual input.
    pub fn set_count(
        &mut self,
        device_type: &str,
        device_number: u32,
        pest_name: &str,
        raw: &str,
    ) -> &[Pest] {
        let count = parse_count(raw);
        self.update(device_type, device_number, pest_name, |_| count)
    }

    /// Close the draft for a device, keeping only positive counts.
    ///
    /// Replaces any earlier entry for the same device; a device with
    /// nothing positive ends up with no entry at all.
    pub fn commit(&mut self, device_type: &str, device_number: u32) -> Option<DevicePestCount> {
        let pests = self
            .drafts
            .iter()
            .position(|d| d.device_type == device_type && d.device_number == device_number)
            .map(|idx| self.drafts.remove(idx).pests)
            .unwrap_or_default();

        self.committed
            .retain(|d| !(d.device_type == device_type && d.device_number == device_number));

        let entry = commit(device_type, device_number, &pests)?;
        debug!(
            device_type,
            device_number,
            pests = entry.pests.len(),
            "committed pest counts"
        );
        self.committed.push(entry.clone());
        Some(entry)
    }

    pub fn committed(&self) -> &[DevicePestCount] {
        &self.committed
    }

    /// Drop every draft and committed count.
    pub fn reset(&mut self) {
        self.drafts.clear();
        self.committed.clear();
    }
}
