use crate::model::{service_key, SavedDevice};
use crate::summary::outcome::{DeviceGroup, DeviceSummaryRow, StatusEntry, StatusSummary};
use crate::summary::range::compress;
use rust_decimal::{Decimal, RoundingStrategy};

/// Bucket saved devices by type, in first-seen order.
///
/// Every device counts toward its group's quantity and list; only devices
/// with a non-empty status contribute to a status entry.
pub fn group(saved: &[SavedDevice]) -> Vec<DeviceGroup> {
    let mut groups: Vec<DeviceGroup> = Vec::new();

    for device in saved {
        let idx = match groups
            .iter()
            .position(|g| g.device_type == device.device_type)
        {
            Some(idx) => idx,
            None => {
                groups.push(DeviceGroup {
                    device_type: device.device_type.clone(),
                    quantity: 0,
                    status: Vec::new(),
                    list: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];

        group.quantity += 1;
        // Devices without a number are listed by id
        group
            .list
            .push(device.number.unwrap_or(device.id).to_string());

        if device.status.is_empty() {
            continue;
        }
        let status_idx = match group.status.iter().position(|s| s.name == device.status) {
            Some(i) => {
                group.status[i].count += 1;
                i
            }
            None => {
                group.status.push(StatusEntry {
                    name: device.status.clone(),
                    count: 1,
                    devices: Vec::new(),
                });
                group.status.len() - 1
            }
        };
        if let Some(number) = device.number {
            group.status[status_idx].devices.push(number);
        }
    }

    groups
}

/// Turn groups into report rows: compressed ranges, statuses sorted by name,
/// and each status's share of the group's quantity.
pub fn summarize(groups: &[DeviceGroup]) -> Vec<DeviceSummaryRow> {
    groups.iter().map(summarize_group).collect()
}

fn summarize_group(group: &DeviceGroup) -> DeviceSummaryRow {
    let mut status: Vec<StatusSummary> = group
        .status
        .iter()
        .map(|s| StatusSummary {
            name: s.name.clone(),
            count: s.count,
            devices: compress(&s.devices),
            percentage: percentage(s.count, group.quantity),
        })
        .collect();
    status.sort_by(|a, b| {
        service_key(&a.name)
            .cmp(&service_key(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    let numbers: Vec<u32> = group
        .list
        .iter()
        .filter_map(|n| n.parse::<u32>().ok())
        .collect();

    DeviceSummaryRow {
        device_type: group.device_type.clone(),
        quantity: group.quantity,
        status,
        list: compress(&numbers),
    }
}

/// `count / quantity * 100`, rounded half away from zero to one decimal.
pub fn percentage(count: u32, quantity: u32) -> Decimal {
    if quantity == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(quantity))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
