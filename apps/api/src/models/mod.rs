pub mod career;
pub mod cv;
pub mod internship;
pub mod job;
pub mod local_vibe;
pub mod todo;
pub mod user;
