//! API module - REST handlers and auth

pub mod auth;
pub mod dto;
pub mod rest;

pub use rest::create_rest_router;
