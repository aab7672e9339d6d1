mod websocket;

pub use websocket::*;
