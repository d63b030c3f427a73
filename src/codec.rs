//! # 图像编解码模块
//!
//! 引擎面向字节的调用接口：把图像文件字节解码为 [`PixelBuffer`]，隐写或恢复后再以无损格式写回。
//!
//! 带 alpha 的图像统一按 8 位 RGBA 处理，其余按 8 位 RGB 处理。编码与解码使用同样的归一化，
//! 因此任何可读的输入格式都遵循同一个通道顺序。

use crate::error::{Result, StegoError};
use crate::pixels::PixelBuffer;
use crate::steganography;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

/// 可以写出且不破坏最低有效位的格式。
pub const LOSSLESS_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::Qoi,
    ImageFormat::WebP,
];

pub fn is_lossless(format: ImageFormat) -> bool {
    LOSSLESS_FORMATS.contains(&format)
}

/// 根据文件头猜测图像格式。
pub fn detect_format(image_bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(image_bytes).ok()
}

/// 把图像文件字节解码为像素缓冲区。
pub fn load_pixels(image_bytes: &[u8]) -> Result<PixelBuffer> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| StegoError::InvalidImage(e.to_string()))?;
    let (width, height) = (img.width(), img.height());

    if img.color().has_alpha() {
        PixelBuffer::new(width, height, 4, img.into_rgba8().into_raw())
    } else {
        PixelBuffer::new(width, height, 3, img.into_rgb8().into_raw())
    }
}

/// 以 `format` 把像素缓冲区重新编码为文件字节。
///
/// # Errors
///
/// `format` 不是无损格式时返回 `UnsupportedFormat`。
pub fn save_pixels(pixels: PixelBuffer, format: ImageFormat) -> Result<Vec<u8>> {
    ensure_lossless(format)?;

    let (width, height) = (pixels.width(), pixels.height());
    let img = if pixels.has_alpha() {
        RgbaImage::from_raw(width, height, pixels.into_raw()).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(width, height, pixels.into_raw()).map(DynamicImage::ImageRgb8)
    };
    let img = img.ok_or_else(|| {
        StegoError::InvalidImage("pixel buffer does not match its dimensions".into())
    })?;

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format)?;
    Ok(out)
}

/// 在图像文件中隐藏 `message`，并以 `output_format` 输出。
///
/// 输出格式与检测到的输入格式不同时会记录一条警告。
///
/// # Errors
///
/// `UnsupportedFormat`、`InvalidImage`、`MessageTooLarge` 或 `CapacityExceeded`。
pub fn encode_image(
    image_bytes: &[u8],
    message: &str,
    output_format: ImageFormat,
) -> Result<Vec<u8>> {
    ensure_lossless(output_format)?;

    if let Some(input_format) = format_conversion(image_bytes, output_format) {
        log::warn!(
            "converting {:?} input to {:?}; the hidden message is only recoverable from the {:?} output",
            input_format,
            output_format,
            output_format
        );
    }

    let cover = load_pixels(image_bytes)?;
    let carrier = steganography::encode(&cover, message.as_bytes())?;
    save_pixels(carrier, output_format)
}

/// 从图像文件中恢复隐藏的文本。
///
/// # Errors
///
/// `InvalidImage`、`TruncatedPayload`，或恢复出的字节不是 UTF-8 时返回 `InvalidText`。
pub fn decode_image(image_bytes: &[u8]) -> Result<String> {
    let carrier = load_pixels(image_bytes)?;
    let message = steganography::decode(&carrier)?;
    Ok(String::from_utf8(message)?)
}

/// 图像的隐写容量。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capacity {
    /// 可隐写的通道字节数 (比特)。
    pub bits: usize,
    /// 扣除长度前缀后最多能隐藏的消息字节数。
    pub max_message_len: usize,
}

/// 图像文件的隐写容量。
pub fn image_capacity(image_bytes: &[u8]) -> Result<Capacity> {
    let pixels = load_pixels(image_bytes)?;
    Ok(Capacity {
        bits: steganography::capacity_bits(&pixels)?,
        max_message_len: steganography::max_message_len(&pixels)?,
    })
}

/// 输出格式与检测到的输入格式不同时，返回输入格式。
pub fn format_conversion(image_bytes: &[u8], output_format: ImageFormat) -> Option<ImageFormat> {
    detect_format(image_bytes).filter(|input_format| *input_format != output_format)
}

fn ensure_lossless(format: ImageFormat) -> Result<()> {
    if !is_lossless(format) {
        return Err(StegoError::UnsupportedFormat(format!(
            "{:?} cannot be written losslessly",
            format
        )));
    }
    Ok(())
}
