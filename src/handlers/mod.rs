pub mod accounts;
pub mod links;
pub mod redirect;
