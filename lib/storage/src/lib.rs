pub mod manager;
pub mod wal;
pub mod lmdb_storage;
pub mod snapshot;
pub mod persistence;

pub use manager::StorageManager;
pub use wal::WriteAheadLog;
pub use lmdb_storage::LmdbStorage;
pub use snapshot::SnapshotManager;
pub use persistence::ForkBasedPersistence;

