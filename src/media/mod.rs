pub mod codec;
pub mod lifecycle;
pub mod upload;
