//! HTTP request handlers

pub mod image;
pub mod service;
pub mod upload;

pub use image::*;
pub use service::*;
pub use upload::*;
