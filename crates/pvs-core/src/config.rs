// ── Provider connection ──
//
// Identity of the PowerVS workspace being inventoried. The availability
// zone is derived from it rather than from any fetched record. Built by
// the config crate or the CLI; core never reads config files.

use crate::error::CoreError;
use crate::model::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConnection {
    /// Display name of the connection (becomes the zone name).
    pub name: String,
    /// Workspace (cloud instance) id; the zone's `ems_ref`.
    pub uid_ems: EntityId,
}

impl ProviderConnection {
    pub fn new(name: impl Into<String>, uid_ems: impl Into<EntityId>) -> Result<Self, CoreError> {
        let name = name.into();
        let uid_ems = uid_ems.into();
        if name.trim().is_empty() {
            return Err(CoreError::Config {
                message: "connection name must not be empty".into(),
            });
        }
        if uid_ems.to_string().trim().is_empty() {
            return Err(CoreError::Config {
                message: "workspace id must not be empty".into(),
            });
        }
        Ok(Self { name, uid_ems })
    }
}
