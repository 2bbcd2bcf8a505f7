pub mod signup_request;
