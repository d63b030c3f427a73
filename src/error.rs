//! # 错误类型模块
//!
//! 隐写引擎的全部失败情形。每个错误都只属于一次调用，引擎在失败时不会留下任何部分写入的状态。

use std::string::FromUtf8Error;
use thiserror::Error;

/// 引擎返回值的简写。
pub type Result<T> = std::result::Result<T, StegoError>;

#[derive(Error, Debug)]
pub enum StegoError {
    /// 图像无法解码，或像素缓冲区长度与声明的尺寸不符。
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// 通道索引超出了可隐写通道的范围。
    #[error("Channel index {index} is out of range (channel count: {len})")]
    OutOfRange { index: usize, len: usize },

    /// 消息长度无法用长度前缀表示。
    #[error("Message of {0} bytes does not fit in the length prefix")]
    MessageTooLarge(usize),

    /// 图像没有足够的可隐写通道来容纳负载。
    #[error("Not enough space in the image: required {required} bits, available {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// 比特源在长度前缀或消息读完之前就耗尽了。
    #[error(
        "Truncated payload: required {required} bits, available {available} bits. \
         The image may not contain a hidden message or is corrupted"
    )]
    TruncatedPayload { required: usize, available: usize },

    /// 恢复出的字节不是合法的 UTF-8 文本。
    #[error("Recovered message is not valid UTF-8: {0}")]
    InvalidText(#[from] FromUtf8Error),

    /// 输出格式不是可写入的无损格式。
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// 重新编码结果图像时失败。
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}
