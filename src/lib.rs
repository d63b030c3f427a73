//! # lsb_codec 库
//!
//! 顺序 LSB 隐写引擎：把带 32 位长度前缀的消息逐位写入图像 R, G, B 通道字节的最低有效位，
//! 并能从隐写图像中恢复。这不是加密，也无法抵抗缩放、有损压缩或格式转换。

pub mod channels;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod payload;
pub mod pixels;
pub mod steganography;

pub use error::{Result, StegoError};
pub use pixels::PixelBuffer;
