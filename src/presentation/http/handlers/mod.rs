pub mod api;
pub mod gallery;
pub mod health;
pub mod upload;
