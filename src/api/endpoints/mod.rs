pub mod applications;
pub mod consents;
pub mod health;
pub mod uploads;
