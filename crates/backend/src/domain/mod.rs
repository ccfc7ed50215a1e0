pub mod a001_chat;
pub mod a002_image;
