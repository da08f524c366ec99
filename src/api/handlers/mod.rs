pub mod auth;
pub mod notices;
pub mod photos;
pub mod root;
pub mod uploads;
