pub mod config_manager;

pub use config_manager::{AdapterConfig, ConfigAdapter, FileConfigAdapter, BIDDER_CODE, GVL_ID};
