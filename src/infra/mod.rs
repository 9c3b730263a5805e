pub mod http_client;
pub mod static_source;

pub use http_client::ReqwestSource;
pub use static_source::StaticSource;
