pub mod bid;
pub mod context;
pub mod imps;
pub mod partner;
pub mod slot;
