//! # 像素通道流模块
//!
//! 把图像的可隐写通道字节呈现为一个扁平、有序、可按索引访问的序列。
//!
//! 顺序是编码器与解码器之间唯一的约定：像素按行优先 (第 0 行从左到右，然后第 1 行 ...)，
//! 每个像素内按 R, G, B 递增，alpha 永远跳过。整个系统只通过 [`channel_offset`] 计算这一顺序。

use crate::constants::EMBED_CHANNELS;
use crate::error::{Result, StegoError};
use crate::pixels::buffer_len;

/// 第 `index` 个可隐写通道字节在像素缓冲区中的偏移。
///
/// `pixel_stride` 是每个像素的字节数 (RGB 为 3，RGBA 为 4)。
pub fn channel_offset(index: usize, pixel_stride: usize) -> usize {
    (index / EMBED_CHANNELS) * pixel_stride + index % EMBED_CHANNELS
}

/// 绑定到某个像素缓冲区的通道流。
///
/// `B` 为 `&[u8]` 时只读，为 `&mut [u8]` 时可写。
#[derive(Debug)]
pub struct ChannelStream<B> {
    buf: B,
    pixel_stride: usize,
    len: usize,
}

impl<B: AsRef<[u8]>> ChannelStream<B> {
    /// 绑定到按 `width * height * channels` 排列的缓冲区。
    ///
    /// # Errors
    ///
    /// 缓冲区长度与声明的尺寸不符时返回 `InvalidImage`。
    pub fn open(buf: B, width: u32, height: u32, channels: usize) -> Result<Self> {
        let expected = buffer_len(width, height, channels)?;
        let actual = buf.as_ref().len();
        if actual != expected {
            return Err(StegoError::InvalidImage(format!(
                "buffer holds {} bytes but {}x{}x{} requires {}",
                actual, width, height, channels, expected
            )));
        }

        let pixels = expected / channels;
        Ok(Self {
            buf,
            pixel_stride: channels,
            len: pixels * EMBED_CHANNELS,
        })
    }

    /// 可隐写的通道字节总数，也就是以比特计的容量。
    pub fn channel_count(&self) -> usize {
        self.len
    }

    pub fn read_byte(&self, index: usize) -> Result<u8> {
        self.check(index)?;
        Ok(self.buf.as_ref()[channel_offset(index, self.pixel_stride)])
    }

    /// 按流顺序依次给出每个通道字节的最低有效位。
    pub fn lsbs(&self) -> impl Iterator<Item = u8> + '_ {
        let buf = self.buf.as_ref();
        (0..self.len).map(move |i| buf[channel_offset(i, self.pixel_stride)] & 1)
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(StegoError::OutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> ChannelStream<B> {
    pub fn write_byte(&mut self, index: usize, value: u8) -> Result<()> {
        self.check(index)?;
        self.buf.as_mut()[channel_offset(index, self.pixel_stride)] = value;
        Ok(())
    }
}
