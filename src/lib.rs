pub mod api;
pub mod notice;
pub mod session;
pub mod settings;
pub mod utils;
pub mod weightings;
