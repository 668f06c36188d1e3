pub mod command;
pub mod message;
pub mod ready;
pub mod router;
