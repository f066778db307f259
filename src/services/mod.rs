//! Service layer: ports (traits + message contracts) and the concrete
//! HTTP/filesystem adapters behind them.

pub mod http;
pub mod layout;
pub mod message;
pub mod ports;

pub use http::HttpCompileService;
pub use layout::JsonLayoutStore;
pub use message::CompileMessage;
pub use ports::{CompileTransport, LayoutStore, OutputView};
