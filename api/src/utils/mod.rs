pub mod serde;
pub mod yaml;
