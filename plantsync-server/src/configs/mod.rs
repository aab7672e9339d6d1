mod settings;

pub use settings::{Advisory, Backend, Logger, Redis, Server, Settings};
