pub mod me;
pub mod messages;
