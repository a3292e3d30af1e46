mod email_address;
mod knowledge_catalog;
mod password;
mod record_id;
pub mod timestamp;

pub use email_address::EmailAddress;
pub use knowledge_catalog::{CatalogCache, KnowledgeCatalog};
pub use password::NewPassword;
pub use record_id::RecordId;
