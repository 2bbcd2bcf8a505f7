pub mod mailchimp_lists;
pub mod mailchimp_oauth;
pub mod signup;
