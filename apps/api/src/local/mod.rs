pub mod handlers;
pub mod travel;
pub mod vibes;
