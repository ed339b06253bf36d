//! Common repository traits
//!
//! Generic interfaces for the single-row database operations. Repositories
//! implement only the ones their table allows: the audit log, for example,
//! has `Create` and nothing else.

/// Inserts a new row
///
/// * `Entity` - Returned entity, with the id assigned by the database
/// * `CreateDTO` - Insert payload, without id
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Reads one row by primary key
///
/// # Returns
/// * `Ok(Some(Entity))` - Entity found
/// * `Ok(None)` - No entity with that id
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Partial update: only the `Some(_)` fields of `UpdateDTO` are written.
/// Fails with `RowNotFound` when the id does not exist.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Deletes one row by primary key. Fails with `RowNotFound` when nothing was deleted.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<(), sqlx::Error>;
}
