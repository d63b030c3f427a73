//! # 负载成帧模块
//!
//! 负载 = 32 位大端长度前缀 + 消息字节。比特按字节内最高位优先、前缀在前的顺序给出。

use crate::constants::{BITS_PER_BYTE, PREFIX_BITS};
use crate::error::{Result, StegoError};

const PREFIX_BYTES: usize = PREFIX_BITS / BITS_PER_BYTE;

/// 隐写 `message_len` 字节的消息所需的比特数。
pub fn required_bits(message_len: usize) -> usize {
    message_len
        .saturating_mul(BITS_PER_BYTE)
        .saturating_add(PREFIX_BITS)
}

/// 一条已成帧的消息。
#[derive(Clone, Debug)]
pub struct Payload<'a> {
    prefix: [u8; PREFIX_BYTES],
    message: &'a [u8],
}

impl<'a> Payload<'a> {
    /// # Errors
    ///
    /// 消息长度超出前缀可表示的范围时返回 `MessageTooLarge`。
    pub fn frame(message: &'a [u8]) -> Result<Self> {
        let len = u32::try_from(message.len())
            .map_err(|_| StegoError::MessageTooLarge(message.len()))?;

        Ok(Self {
            prefix: len.to_be_bytes(),
            message,
        })
    }

    pub fn bit_len(&self) -> usize {
        (PREFIX_BYTES + self.message.len()) * BITS_PER_BYTE
    }

    /// 从头开始的比特序列，每次调用都会重新开始。
    pub fn bits(&self) -> Bits<'_> {
        Bits {
            prefix: &self.prefix,
            message: self.message,
            pos: 0,
            len: self.bit_len(),
        }
    }
}

/// [`Payload::bits`] 返回的惰性比特迭代器，每一项为 0 或 1。
#[derive(Clone, Debug)]
pub struct Bits<'a> {
    prefix: &'a [u8],
    message: &'a [u8],
    pos: usize,
    len: usize,
}

impl Iterator for Bits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.pos >= self.len {
            return None;
        }

        let byte_index = self.pos / BITS_PER_BYTE;
        let byte = if byte_index < PREFIX_BYTES {
            self.prefix[byte_index]
        } else {
            self.message[byte_index - PREFIX_BYTES]
        };
        let shift = BITS_PER_BYTE - 1 - self.pos % BITS_PER_BYTE;
        self.pos += 1;

        Some((byte >> shift) & 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}

/// 从比特源中还原消息。
///
/// 先读取恰好 `PREFIX_BITS` 个比特作为字节数 N，再读取 `8 * N` 个比特重组为 N 个字节。
/// 之后剩余的比特不会被消费。
///
/// # Errors
///
/// 比特源在前缀或消息读完之前耗尽时返回 `TruncatedPayload`。
pub fn unframe<I>(bits: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = u8>,
{
    let mut bits = bits.into_iter();
    let mut consumed = 0usize;

    let mut prefix = 0u32;
    for _ in 0..PREFIX_BITS {
        let bit = bits.next().ok_or_else(|| StegoError::TruncatedPayload {
            required: PREFIX_BITS,
            available: consumed,
        })?;
        prefix = (prefix << 1) | u32::from(bit & 1);
        consumed += 1;
    }

    let len = prefix as usize;
    let required = required_bits(len);
    log::debug!("length prefix declares {} bytes ({} bits)", len, required);

    let (available_hint, _) = bits.size_hint();
    let mut message = Vec::with_capacity(len.min(available_hint / BITS_PER_BYTE));
    for _ in 0..len {
        let mut byte = 0u8;
        for _ in 0..BITS_PER_BYTE {
            let bit = bits.next().ok_or_else(|| StegoError::TruncatedPayload {
                required,
                available: consumed,
            })?;
            byte = (byte << 1) | (bit & 1);
            consumed += 1;
        }
        message.push(byte);
    }

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(bytes: &[u8]) -> Vec<u8> {
        bytes
            .iter()
            .flat_map(|&b| (0..8).rev().map(move |s| (b >> s) & 1))
            .collect()
    }

    #[test]
    fn frame_emits_prefix_then_message_msb_first() {
        let payload = Payload::frame(b"Hi").unwrap();
        let bits: Vec<u8> = payload.bits().collect();

        assert_eq!(payload.bit_len(), 48);
        assert_eq!(bits.len(), 48);
        assert_eq!(bits, bits_of(&[0, 0, 0, 2, b'H', b'i']));
    }

    #[test]
    fn bits_are_restartable() {
        let payload = Payload::frame(b"abc").unwrap();
        let first: Vec<u8> = payload.bits().collect();
        let second: Vec<u8> = payload.bits().collect();

        assert_eq!(first, second);
        assert_eq!(payload.bits().len(), required_bits(3));
    }

    #[test]
    fn empty_message_is_prefix_only() {
        let payload = Payload::frame(b"").unwrap();
        assert_eq!(payload.bits().collect::<Vec<_>>(), vec![0; 32]);
        assert_eq!(unframe(payload.bits()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn unframe_ignores_trailing_bits() {
        let mut bits = bits_of(&[0, 0, 0, 1, 0xA5]);
        bits.extend([1, 0, 1, 1, 1, 1, 1]);

        assert_eq!(unframe(bits).unwrap(), vec![0xA5]);
    }

    #[test]
    fn unframe_reports_short_prefix() {
        let err = unframe(vec![0u8; 20]).unwrap_err();
        assert!(matches!(
            err,
            StegoError::TruncatedPayload {
                required: 32,
                available: 20
            }
        ));
    }

    #[test]
    fn unframe_reports_short_message() {
        let mut bits = bits_of(&[0, 0, 0, 3, b'a']);
        bits.extend([0, 1, 1]);

        let err = unframe(bits).unwrap_err();
        assert!(matches!(
            err,
            StegoError::TruncatedPayload {
                required: 56,
                available: 43
            }
        ));
    }
}
