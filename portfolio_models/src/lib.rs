pub mod catalog;
pub mod client;
pub mod contact;
pub mod email_address;
mod macros;
