use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use crate::errors::ServiceError;
use crate::services::upsert::NaturalKey;

pub mod brand_repository;
pub mod product_repository;
pub mod strain_repository;
pub mod variant_repository;

pub use brand_repository::BrandRepository;
pub use product_repository::ProductRepository;
pub use strain_repository::StrainRepository;
pub use variant_repository::{VariantDefaults, VariantRepository};

/// Repository trait for common database operations
///
/// Repositories borrow their connection, so the same repository runs on the pool
/// or inside a `DatabaseTransaction`.
pub trait Repository {
    type Connection: ConnectionTrait;

    fn get_db(&self) -> &Self::Connection;
}

/// Store operations the upsert resolver is built on.
#[async_trait]
pub trait UpsertRepository: Send + Sync {
    type Key: NaturalKey + Send + Sync;
    type Changes: Send;
    type Record: Clone + Send;

    /// Rejects `changes` that set a key field to something other than `key`.
    fn check_key_fields(
        &self,
        _key: &Self::Key,
        _changes: &Self::Changes,
    ) -> Result<(), ServiceError> {
        Ok(())
    }

    /// First record matching `key`, ordered by creation time then id.
    async fn find_by_key(&self, key: &Self::Key) -> Result<Option<Self::Record>, ServiceError>;

    /// Inserts a record whose key fields are taken from `key`.
    async fn create(
        &self,
        key: &Self::Key,
        changes: Self::Changes,
    ) -> Result<Self::Record, ServiceError>;

    /// Applies `changes` to `record`; absent fields are left untouched.
    async fn update(
        &self,
        record: Self::Record,
        changes: Self::Changes,
    ) -> Result<Self::Record, ServiceError>;
}
