pub mod credentials_actor;
