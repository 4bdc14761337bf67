pub mod config;
pub mod error;

mod policy;

pub use config::TableConfig;
pub use error::ErrorKind;
pub use policy::InsertPolicy;
