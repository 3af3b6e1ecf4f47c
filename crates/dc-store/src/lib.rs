pub mod config;
pub mod error;
pub mod json_bridge;
pub mod plan;
pub mod practice;
pub mod schema;
pub mod store;

pub use config::{CONFIG_FILE, Config};
pub use error::{Result, StoreError};
pub use practice::{DB_FILE, PracticeStore, Standing, default_base_dir};
pub use store::Store;
