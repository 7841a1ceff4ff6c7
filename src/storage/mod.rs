pub mod database;

pub use database::{NewUser, ProjectRecord, UserRecord, open_database};
