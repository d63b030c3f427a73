use crate::constants::{BITS_PER_BYTE, PREFIX_BITS};
use crate::error::{Result, StegoError};
use crate::payload::{Payload, unframe};
use crate::pixels::PixelBuffer;

/// 图像的隐写容量 (比特)。
pub fn capacity_bits(image: &PixelBuffer) -> Result<usize> {
    Ok(image.stream()?.channel_count())
}

/// 图像最多能容纳的消息字节数。
pub fn max_message_len(image: &PixelBuffer) -> Result<usize> {
    Ok(capacity_bits(image)?.saturating_sub(PREFIX_BITS) / BITS_PER_BYTE)
}

/// 把 `message` 写入 `cover` 可隐写通道的最低有效位，返回一张新图像。
///
/// 只有前 `PREFIX_BITS + 8 * message.len()` 个通道字节的最低位可能改变，其余字节与原图一致。
/// 结果只有在以无损格式保存时才能被恢复。
///
/// # Errors
///
/// * `MessageTooLarge`: 消息长度超出前缀范围。
/// * `CapacityExceeded`: 图像容量不足，此时不会产生任何输出。
pub fn encode(cover: &PixelBuffer, message: &[u8]) -> Result<PixelBuffer> {
    let payload = Payload::frame(message)?;
    let required = payload.bit_len();
    let available = capacity_bits(cover)?;

    log::debug!(
        "embedding {} bytes: {} of {} bits",
        message.len(),
        required,
        available
    );

    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let mut carrier = cover.clone();
    let mut stream = carrier.stream_mut()?;
    for (index, bit) in payload.bits().enumerate() {
        let byte = stream.read_byte(index)?;
        stream.write_byte(index, (byte & 0xFE) | bit)?;
    }

    Ok(carrier)
}

/// 从 `carrier` 中恢复消息字节。
///
/// 不校验图像是否真的经过隐写：长度前缀按字面读取，未隐写的图像可能得到无意义但合法的结果。
///
/// # Errors
///
/// 长度前缀声明的比特数超出图像容量时返回 `TruncatedPayload`。
pub fn decode(carrier: &PixelBuffer) -> Result<Vec<u8>> {
    let stream = carrier.stream()?;
    let message = unframe(stream.lsbs())?;

    log::debug!(
        "recovered {} bytes from {} capacity bits",
        message.len(),
        stream.channel_count()
    );

    Ok(message)
}
