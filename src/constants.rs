/// 长度前缀的位宽。
/// 消息字节数以 `u32` 大端形式写在负载最前面，因此消息长度上限为 `u32::MAX`。
pub const PREFIX_BITS: usize = 32;

/// 每个像素中参与隐写的通道数 (R, G, B)。
/// Alpha 通道即使存在也不参与隐写。
pub const EMBED_CHANNELS: usize = 3;

/// 每个消息字节占用的比特数。
pub const BITS_PER_BYTE: usize = 8;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const ENCODED_PREFIX: &str = "encoded_";

/// 未指定输出路径时，恢复文本文件名的前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";
