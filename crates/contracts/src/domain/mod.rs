// Chat relay (a001) and image relay (a002)
pub mod a001_chat;
pub mod a002_image;
