// AI career planner: a 4–6 step roadmap per user, reused until the user asks
// for a new one with extra details.

pub mod handlers;
pub mod planner;
pub mod prompts;
