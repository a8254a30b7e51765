pub mod auth_service;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};

pub mod auth_service_impl;
pub use auth_service_impl::StoreAuthService;

pub mod password;
pub mod token;
