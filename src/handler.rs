//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的业务逻辑。
//! 本模块负责文件 I/O 和输出路径，调用 [`codec`](crate::codec) 完成隐写，并向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::codec::{self, decode_image, encode_image, image_capacity};
use crate::constants::{ENCODED_PREFIX, RECOVERED_PREFIX};
use crate::error::StegoError;
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取图像和文本文件，确定输出格式与路径，隐藏文本后写入目标图像文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件，或文本不是 UTF-8。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let text = fs::read_to_string(&args.text).with_context(|| {
        format!(
            "Unable to read text file as UTF-8: {}",
            args.text.to_string_lossy().red().bold()
        )
    })?;

    let format = args
        .format
        .map(ImageFormat::from)
        .or_else(|| codec::detect_format(&picture).filter(|f| codec::is_lossless(*f)))
        .unwrap_or(ImageFormat::Png);

    let dest = args
        .dest
        .unwrap_or_else(|| default_encoded_path(&args.image, format));
    ensure_writable(&dest, args.force)?;

    let encoded = match encode_image(&picture, &text, format) {
        Err(StegoError::CapacityExceeded {
            required,
            available,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the text. \nRequired: {} bits, Available: {} bits",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        result => result.with_context(|| {
            format!(
                "Failed to hide the text in '{}'.",
                args.image.to_string_lossy().red().bold()
            )
        })?,
    };

    fs::write(&dest, encoded).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 读取经过隐写的图像文件，恢复隐藏的文本并写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 目标文件已存在且未指定 `--force`。
/// * 图像中没有可恢复的文本，或恢复出的内容不是 UTF-8。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let dest = args
        .text
        .unwrap_or_else(|| default_recovered_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let text = decode_image(&picture).with_context(|| {
        format!(
            "Failed to recover text from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像的容量比特数和可隐藏的最大字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let picture = fs::read(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let capacity = image_capacity(&picture).with_context(|| {
        format!(
            "Unable to decode image: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "Capacity: {} bits, up to {} bytes of text",
        capacity.bits.to_string().green().bold(),
        capacity.max_message_len.to_string().green().bold()
    );
    Ok(())
}

/// 默认的隐写结果路径：与输入图像同目录的 `encoded_<文件名>`，扩展名与输出格式一致。
pub fn default_encoded_path(image: &Path, format: ImageFormat) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    let ext = format.extensions_str().first().copied().unwrap_or("png");
    image.with_file_name(format!("{}{}.{}", ENCODED_PREFIX, stem, ext))
}

/// 默认的恢复文本路径：与图像同目录的 `recovered_<文件名>.txt`。
pub fn default_recovered_path(image: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    image.with_file_name(format!("{}{}.txt", RECOVERED_PREFIX, stem))
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}
