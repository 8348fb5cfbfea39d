pub mod backup;
pub mod catalog;
pub mod devices;
pub mod order;
pub mod pests;
pub mod ranges;
pub mod report;
pub mod schedule;
pub mod services;

use safeprag_core::catalog::builtin;
use safeprag_core::catalog::schema::CatalogDef;
use safeprag_core::error::SafepragError;
use safeprag_core::order::{Activity, TracingObserver};
use safeprag_core::store::state::{load_activity, save_activity};
use safeprag_core::store::DirStore;
use std::path::{Path, PathBuf};

/// Global options shared by every subcommand.
pub struct Context {
    pub data_dir: PathBuf,
    pub catalog: Option<PathBuf>,
}

impl Context {
    pub fn store(&self) -> Result<DirStore, SafepragError> {
        DirStore::open(&self.data_dir)
    }

    pub fn catalog(&self) -> Result<CatalogDef, SafepragError> {
        load_catalog(self.catalog.as_deref())
    }

    /// The stored activity, for commands that only read it.
    pub fn activity(&self) -> Result<Activity, SafepragError> {
        load_activity(&self.store()?, self.catalog()?)
    }

    /// Run `f` against the stored activity and save it back on success.
    pub fn with_activity<T>(
        &self,
        f: impl FnOnce(&mut Activity) -> Result<T, SafepragError>,
    ) -> Result<T, SafepragError> {
        let mut store = self.store()?;
        let mut activity = load_activity(&store, self.catalog()?)?;
        activity.add_observer(Box::new(TracingObserver));
        let value = f(&mut activity)?;
        save_activity(&mut store, &activity)?;
        Ok(value)
    }
}

/// The catalog at `path`, or the built-in default.
pub fn load_catalog(path: Option<&Path>) -> Result<CatalogDef, SafepragError> {
    match path {
        Some(path) => safeprag_core::catalog::load_catalog(path),
        None => builtin::default_catalog(),
    }
}
