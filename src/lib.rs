pub mod countries;
pub mod fetch;
pub mod process;
pub mod snapshot;
