pub mod media_handlers;
pub mod order_handlers;
pub mod proxy_handlers;
pub mod upload_handlers;
