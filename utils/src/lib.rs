pub mod ber;
pub mod dissectors;
