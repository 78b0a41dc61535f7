pub mod auth;
pub mod org_upstream;
pub mod site_upstream;
pub mod upstream;
