pub mod auth_services;
pub mod feed_services;
pub mod password;
pub mod profile_services;
