pub mod handlers;
pub mod search;
