pub mod dto;

pub use dto::{ImageRequest, ImageResponse};
