use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::{
    error::{Error, Result},
    tags::TagRegistry,
};

/// Tag name -> registration sequence number.
const TAGS: TableDefinition<&str, u64> = TableDefinition::new("tags");
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Settings key for the default content folder.
pub const CONTENT_ROOT: &str = "content_root";

pub struct ConfigDb {
    db: Database,
}

impl ConfigDb {
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path)?;

        // Ensure all tables exist by opening them in a write transaction.
        let txn = db.begin_write()?;
        txn.open_table(TAGS)?;
        txn.open_table(SETTINGS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    // -- Tags --

    /// Register a tag after all existing ones. Returns `false` if it was
    /// already registered.
    pub fn add_tag(&self, name: &str) -> Result<bool> {
        if name.is_empty() || name.contains(',') {
            return Err(Error::Config(format!("invalid tag name: {name:?}")));
        }

        let txn = self.db.begin_write()?;
        let added = {
            let mut table = txn.open_table(TAGS)?;
            if table.get(name)?.is_some() {
                false
            } else {
                let mut next = 0;
                for entry in table.iter()? {
                    let (_k, v) = entry?;
                    next = next.max(v.value() + 1);
                }
                table.insert(name, next)?;
                true
            }
        };
        txn.commit()?;
        Ok(added)
    }

    pub fn remove_tag(&self, name: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(TAGS)?;
            table.remove(name)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    /// Registered tags in registration order.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(TAGS)?;
        let mut entries = Vec::new();
        for entry in table.iter()? {
            let (k, v) = entry?;
            entries.push((v.value(), k.value().to_string()));
        }
        entries.sort();
        Ok(entries.into_iter().map(|(_, name)| name).collect())
    }

    /// The registry ingestion resolves tag names against.
    pub fn tag_registry(&self) -> Result<TagRegistry> {
        Ok(TagRegistry::new(self.list_tags()?))
    }

    // -- Settings --

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }
}

impl std::fmt::Debug for ConfigDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigDb").finish_non_exhaustive()
    }
}
