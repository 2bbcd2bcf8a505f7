pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod mailchimp_oauth;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use error::BridgeError;
pub use mailchimp_oauth::credentials::CredentialRecord;
pub use mailchimp_oauth::service::MailchimpOauthService;
