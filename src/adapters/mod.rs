// Adapters layer: concrete implementations for external systems (http, storage, page archive).

pub mod archive;
pub mod http;
pub mod storage;
