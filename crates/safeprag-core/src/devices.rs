use crate::catalog::dynamic::same_entry;
use crate::catalog::schema::CatalogDef;
use crate::catalog::{available_statuses, ADD_NEW_SENTINEL};
use crate::error::SafepragError;
use crate::model::{DeviceInstance, SavedDevice};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest quantity accepted for a single device selection.
pub const MAX_DEVICES: u32 = 2000;

/// Create `quantity` devices numbered `start_number..start_number + quantity`.
///
/// Ids mirror the numbers. A quantity outside `0..=MAX_DEVICES`, or one
/// whose last number would not fit in a `u32`, is rejected.
pub fn create_devices(
    device_type: &str,
    quantity: i64,
    start_number: u32,
) -> Result<Vec<DeviceInstance>, SafepragError> {
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|q| *q <= MAX_DEVICES)
        .ok_or(SafepragError::QuantityOutOfRange {
            quantity,
            max: MAX_DEVICES,
        })?;
    if quantity == 0 {
        return Ok(Vec::new());
    }
    let last = start_number
        .checked_add(quantity - 1)
        .ok_or(SafepragError::StartNumberOutOfRange {
            start: start_number,
            quantity,
        })?;

    Ok((start_number..=last)
        .map(|number| DeviceInstance {
            id: number,
            device_type: device_type.to_string(),
            number: Some(number),
            status: None,
        })
        .collect())
}

/// Tap a device: clear an assigned status, otherwise assign the selected
/// status (or `default_status` when nothing is selected).
pub fn toggle_status(
    device: &DeviceInstance,
    selected_status: Option<&str>,
    default_status: &str,
) -> DeviceInstance {
    let status = if device.has_status() {
        None
    } else {
        Some(
            selected_status
                .filter(|s| !s.is_empty())
                .unwrap_or(default_status)
                .to_string(),
        )
    };
    DeviceInstance {
        status,
        ..device.clone()
    }
}

/// Assign `status` to every device that has none yet.
///
/// Only permitted with the default status; existing assignments are kept.
pub fn select_all(
    devices: &[DeviceInstance],
    status: &str,
    default_status: &str,
) -> Result<Vec<DeviceInstance>, SafepragError> {
    if status != default_status {
        return Err(SafepragError::SelectAllRequiresDefault {
            status: status.to_string(),
            expected: default_status.to_string(),
        });
    }
    Ok(devices
        .iter()
        .map(|d| {
            if d.has_status() {
                d.clone()
            } else {
                DeviceInstance {
                    status: Some(status.to_string()),
                    ..d.clone()
                }
            }
        })
        .collect())
}

/// The device working set of the active order plus everything saved so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSession {
    selected_type: String,
    selected_status: String,
    working: Vec<DeviceInstance>,
    saved: Vec<SavedDevice>,
}

impl DeviceSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_type(&self) -> &str {
        &self.selected_type
    }

    pub fn selected_status(&self) -> &str {
        &self.selected_status
    }

    pub fn working(&self) -> &[DeviceInstance] {
        &self.working
    }

    pub fn saved(&self) -> &[SavedDevice] {
        &self.saved
    }

    /// Select a device type and quantity, replacing the working set.
    ///
    /// On error the previous working set is left untouched.
    pub fn select(
        &mut self,
        device_type: &str,
        quantity: i64,
        start_number: u32,
    ) -> Result<&[DeviceInstance], SafepragError> {
        if device_type.trim().is_empty() {
            return Err(SafepragError::MissingRequiredField("device type"));
        }
        let devices = create_devices(device_type, quantity, start_number)?;
        debug!(device_type, quantity, "selected devices");
        self.selected_type = device_type.to_string();
        self.working = devices;
        Ok(&self.working)
    }

    /// Choose the status applied by subsequent taps. An empty status means
    /// the catalog default.
    ///
    /// The status must be offered for the selected type, either by the
    /// catalog or among the user-added `custom` statuses, and is stored as
    /// the offered entry spells it.
    pub fn set_status(
        &mut self,
        catalog: &CatalogDef,
        status: &str,
        custom: &[String],
    ) -> Result<(), SafepragError> {
        let status = status.trim();
        if status.is_empty() {
            self.selected_status.clear();
            return Ok(());
        }
        // Keep the offered spelling so grouping sees a single status name
        let offered = available_statuses(catalog, &self.selected_type, custom)
            .into_iter()
            .find(|s| s != ADD_NEW_SENTINEL && same_entry(s, status))
            .ok_or_else(|| SafepragError::StatusNotAllowed {
                status: status.to_string(),
                device_type: self.selected_type.clone(),
            })?;
        self.selected_status = offered;
        Ok(())
    }

    /// Toggle the status of the working device with this number.
    pub fn tap(&mut self, catalog: &CatalogDef, number: u32) -> Result<&DeviceInstance, SafepragError> {
        let selected = Some(self.selected_status.as_str());
        let device = self
            .working
            .iter_mut()
            .find(|d| d.label() == number)
            .ok_or(SafepragError::DeviceNotFound { number })?;
        *device = toggle_status(device, selected, &catalog.default_status);
        Ok(&*device)
    }

    /// Mark every unassigned working device with the selected status, or
    /// the default status when none is selected.
    pub fn select_all(&mut self, catalog: &CatalogDef) -> Result<(), SafepragError> {
        let status = if self.selected_status.is_empty() {
            catalog.default_status.as_str()
        } else {
            self.selected_status.as_str()
        };
        self.working = select_all(&self.working, status, &catalog.default_status)?;
        Ok(())
    }

    /// Promote the working set to saved devices and clear the selection.
    pub fn save(&mut self) -> Result<usize, SafepragError> {
        if self.working.is_empty() {
            return Err(SafepragError::NoDevicesToSave);
        }
        let count = self.working.len();
        self.saved
            .extend(self.working.drain(..).map(SavedDevice::from));
        self.selected_type.clear();
        self.selected_status.clear();
        debug!(count, total = self.saved.len(), "saved devices");
        Ok(count)
    }

    /// Forget the selected status, falling back to the catalog default.
    pub fn clear_status(&mut self) {
        self.selected_status.clear();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin::default_catalog;

    #[test]
    fn test_create_devices_numbering() {
        let devices = create_devices("Porta isca", 3, 10).unwrap();
        let numbers: Vec<u32> = devices.iter().map(|d| d.label()).collect();
        assert_eq!(numbers, vec![10, 11, 12]);
        assert!(devices.iter().all(|d| d.status.is_none()));
    }

    #[test]
    fn test_create_devices_bounds() {
        assert!(create_devices("Porta isca", 0, 1).unwrap().is_empty());
        assert_eq!(create_devices("Porta isca", 2000, 1).unwrap().len(), 2000);
        assert!(matches!(
            create_devices("Porta isca", 2001, 1),
            Err(SafepragError::QuantityOutOfRange { quantity: 2001, .. })
        ));
        assert!(matches!(
            create_devices("Porta isca", -1, 1),
            Err(SafepragError::QuantityOutOfRange { quantity: -1, .. })
        ));
    }

    #[test]
    fn test_create_devices_near_last_number() {
        let last = create_devices("Porta isca", 1, u32::MAX).unwrap();
        assert_eq!(last[0].label(), u32::MAX);
        assert_eq!(create_devices("Porta isca", 2, u32::MAX - 1).unwrap().len(), 2);
        assert!(matches!(
            create_devices("Porta isca", 2, u32::MAX),
            Err(SafepragError::StartNumberOutOfRange { start: u32::MAX, quantity: 2 })
        ));
        assert!(create_devices("Porta isca", 0, u32::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_toggle_assigns_then_clears() {
        let device = create_devices("Porta isca", 1, 1).unwrap().remove(0);
        let on = toggle_status(&device, Some("Consumida"), "Conforme");
        assert_eq!(on.status.as_deref(), Some("Consumida"));
        let off = toggle_status(&on, Some("Consumida"), "Conforme");
        assert_eq!(off.status, None);
    }

    #[test]
    fn test_toggle_falls_back_to_default() {
        let device = create_devices("Porta isca", 1, 1).unwrap().remove(0);
        assert_eq!(
            toggle_status(&device, None, "Conforme").status.as_deref(),
            Some("Conforme")
        );
        assert_eq!(
            toggle_status(&device, Some(""), "Conforme").status.as_deref(),
            Some("Conforme")
        );
    }

    #[test]
    fn test_select_all_keeps_existing() {
        let mut devices = create_devices("Porta isca", 3, 1).unwrap();
        devices[1].status = Some("Consumida".into());
        let all = select_all(&devices, "Conforme", "Conforme").unwrap();
        assert_eq!(all[0].status.as_deref(), Some("Conforme"));
        assert_eq!(all[1].status.as_deref(), Some("Consumida"));
        assert_eq!(all[2].status.as_deref(), Some("Conforme"));
    }

    #[test]
    fn test_select_all_requires_default() {
        let devices = create_devices("Porta isca", 3, 1).unwrap();
        assert!(matches!(
            select_all(&devices, "Consumida", "Conforme"),
            Err(SafepragError::SelectAllRequiresDefault { .. })
        ));
    }

    #[test]
    fn test_session_rejects_excluded_status() {
        let catalog = default_catalog().unwrap();
        let mut session = DeviceSession::new();
        session.select("Armadilha luminosa", 2, 1).unwrap();
        assert!(matches!(
            session.set_status(&catalog, "Desarmada", &[]),
            Err(SafepragError::StatusNotAllowed { .. })
        ));
        session.set_status(&catalog, "Lâmpada queimada", &[]).unwrap();
    }

    #[test]
    fn test_session_burnt_bulb_only_on_light_traps() {
        let catalog = default_catalog().unwrap();
        let mut session = DeviceSession::new();
        session.select("Porta isca", 2, 1).unwrap();
        assert!(session.set_status(&catalog, "Lâmpada queimada", &[]).is_err());
        assert!(session.set_status(&catalog, ADD_NEW_SENTINEL, &[]).is_err());

        let custom = vec!["Removida pelo cliente".to_string()];
        session.set_status(&catalog, "removida pelo cliente", &custom).unwrap();
        assert_eq!(session.selected_status(), "Removida pelo cliente");
    }

    #[test]
    fn test_status_spellings_group_together() {
        let catalog = default_catalog().unwrap();
        let custom = vec!["Removida pelo cliente".to_string()];
        let mut session = DeviceSession::new();
        session.select("Porta isca", 3, 1).unwrap();
        session.set_status(&catalog, "Removida pelo cliente", &custom).unwrap();
        session.tap(&catalog, 1).unwrap();
        session.set_status(&catalog, "  REMOVIDA pelo cliente ", &custom).unwrap();
        session.tap(&catalog, 2).unwrap();
        session.set_status(&catalog, "conforme", &custom).unwrap();
        session.tap(&catalog, 3).unwrap();
        session.save().unwrap();

        let groups = crate::summary::group(session.saved());
        let names: Vec<&str> = groups[0].status.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Removida pelo cliente", "Conforme"]);
        assert_eq!(groups[0].status[0].count, 2);
        assert_eq!(groups[0].status[0].devices, vec![1, 2]);
    }

    #[test]
    fn test_session_save_and_reset() {
        let catalog = default_catalog().unwrap();
        let mut session = DeviceSession::new();
        assert!(matches!(session.save(), Err(SafepragError::NoDevicesToSave)));

        session.select("Porta isca", 2, 1).unwrap();
        session.tap(&catalog, 2).unwrap();
        assert_eq!(session.save().unwrap(), 2);
        assert!(session.working().is_empty());
        assert_eq!(session.saved()[0].status, "");
        assert_eq!(session.saved()[1].status, "Conforme");

        session.reset();
        assert!(session.saved().is_empty());
    }

    #[test]
    fn test_failed_select_keeps_working_set() {
        let mut session = DeviceSession::new();
        session.select("Porta isca", 2, 1).unwrap();
        assert!(session.select("Porta isca", 5000, 1).is_err());
        assert_eq!(session.working().len(), 2);
    }

    #[test]
    fn test_tap_unknown_device() {
        let catalog = default_catalog().unwrap();
        let mut session = DeviceSession::new();
        session.select("Porta isca", 2, 1).unwrap();
        assert!(matches!(
            session.tap(&catalog, 9),
            Err(SafepragError::DeviceNotFound { number: 9 })
        ));
    }
}
