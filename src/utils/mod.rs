pub mod client_ip;
pub mod user_agent;
