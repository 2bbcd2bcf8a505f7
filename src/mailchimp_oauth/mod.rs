pub mod credentials;
pub mod endpoints;
pub mod service;
