//! `StateStore` port implementation: a redb-backed adapter usable both
//! on disk and in memory, plus the factory that resolves one from an
//! `InstanceSnapshot` (4.C).

pub mod factory;
pub mod store;
pub mod tables;

pub use factory::DefaultStateStoreFactory;
pub use store::RedbStateStore;
