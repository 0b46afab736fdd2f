// Storage core - document store, caching, id generation and index map inverses

pub mod cache;
pub mod database;
pub mod id_generator;
pub mod inverse_associations;

pub use cache::Cache;
pub use database::Database;
pub use id_generator::IdGenerator;
pub use inverse_associations::InverseAssociationMap;
