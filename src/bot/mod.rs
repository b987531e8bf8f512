pub mod conversation;
mod handler;
pub mod polling;

pub use handler::BotHandler;
pub use polling::run_polling;
