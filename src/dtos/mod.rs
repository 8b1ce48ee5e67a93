pub mod api_response;
pub mod auth_dtos;
pub mod feed_dtos;
pub mod profile_dtos;
// alias supaya dapat dipanggil sebagai `crate::dtos::auth`, `crate::dtos::feed`, dst.
pub use auth_dtos as auth;
pub use feed_dtos as feed;
pub use profile_dtos as profile;
