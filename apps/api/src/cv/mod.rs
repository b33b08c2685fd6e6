pub mod builder;
pub mod handlers;
