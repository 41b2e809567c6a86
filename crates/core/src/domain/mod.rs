pub mod garment;
pub mod stats;
pub mod suggestion;
pub mod upload;
pub mod user;
