//! # 像素缓冲区模块
//!
//! `PixelBuffer` 是引擎处理的图像：按行优先排列的 8 位像素，每个像素 3 (RGB) 或 4 (RGBA) 个通道字节。

use crate::channels::ChannelStream;
use crate::error::{Result, StegoError};

/// 一张已解码的图像。
///
/// 缓冲区长度恒等于 `width * height * channels`，构造之后尺寸不会改变。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 从原始像素字节构造图像。
    ///
    /// # Errors
    ///
    /// 通道数不是 3 或 4，或 `data` 的长度与尺寸不符时返回 `InvalidImage`。
    pub fn new(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, channels)?;
        if data.len() != expected {
            return Err(StegoError::InvalidImage(format!(
                "pixel buffer holds {} bytes, {}x{}x{} requires {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 每个像素的通道字节数 (含 alpha)。
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// 以只读方式打开通道流，用于解码。
    pub fn stream(&self) -> Result<ChannelStream<&[u8]>> {
        ChannelStream::open(&self.data[..], self.width, self.height, self.channels)
    }

    /// 以可写方式打开通道流，用于编码。
    pub fn stream_mut(&mut self) -> Result<ChannelStream<&mut [u8]>> {
        ChannelStream::open(&mut self.data[..], self.width, self.height, self.channels)
    }
}

/// 计算给定尺寸下像素缓冲区应有的字节数。
pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    if !(3..=4).contains(&channels) {
        return Err(StegoError::InvalidImage(format!(
            "unsupported channel layout: {} channels per pixel",
            channels
        )));
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            StegoError::InvalidImage(format!("image dimensions {}x{} overflow", width, height))
        })
}
