pub mod mailchimp_api;
