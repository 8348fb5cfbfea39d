use std::fmt;

/// Every key the application persists, with its stable storage name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Company,
    Clients,
    Products,
    Schedules,
    ServiceOrders,
    OrderCounter,
    Devices,
    PestCounts,
    ServiceList,
    ActivityState,
    ClientSignature,
}

impl StorageKey {
    pub const ALL: [StorageKey; 11] = [
        StorageKey::Company,
        StorageKey::Clients,
        StorageKey::Products,
        StorageKey::Schedules,
        StorageKey::ServiceOrders,
        StorageKey::OrderCounter,
        StorageKey::Devices,
        StorageKey::PestCounts,
        StorageKey::ServiceList,
        StorageKey::ActivityState,
        StorageKey::ClientSignature,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Company => "safeprag_company_data",
            StorageKey::Clients => "safeprag_clients",
            StorageKey::Products => "safeprag_products",
            StorageKey::Schedules => "safeprag_schedules",
            StorageKey::ServiceOrders => "safeprag_service_orders",
            StorageKey::OrderCounter => "safeprag_os_counter",
            StorageKey::Devices => "safeprag_devices",
            StorageKey::PestCounts => "safeprag_pest_counts",
            StorageKey::ServiceList => "safeprag_service_list",
            StorageKey::ActivityState => "safeprag_activity_state",
            StorageKey::ClientSignature => "client_signature_data",
        }
    }

    pub fn from_name(name: &str) -> Option<StorageKey> {
        StorageKey::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_and_resolvable() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_name(key.as_str()), Some(key));
        }
        let mut names: Vec<_> = StorageKey::ALL.iter().map(StorageKey::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StorageKey::ALL.len());
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(StorageKey::from_name("safeprag_supabase_connection"), None);
    }
}
