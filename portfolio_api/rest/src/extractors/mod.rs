pub mod json_or_form;
pub mod user_agent;
