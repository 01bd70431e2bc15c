// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! formats: Android HAL pixel formats, the rules that resolve the generic formats into concrete
//! ones, and the per-format layout calculations.

use std::cmp::max;
use std::fmt;

use log::debug;
use log::warn;
use vmm_sys_util::align_upwards;

use crate::gralloc_os::round_up_to_page_size;
use crate::gralloc_utils::*;
use crate::usage::GrallocUsage;

/// A HAL pixel format identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PixelFormat(pub u32);

impl PixelFormat {
    pub const RGBA_8888: PixelFormat = PixelFormat(1);
    pub const RGBX_8888: PixelFormat = PixelFormat(2);
    pub const RGB_888: PixelFormat = PixelFormat(3);
    pub const RGB_565: PixelFormat = PixelFormat(4);
    pub const BGRA_8888: PixelFormat = PixelFormat(5);
    // No longer defined by the framework, but binary-only clients still ask for them.
    pub const SRGB_A_8888: PixelFormat = PixelFormat(12);
    pub const SRGB_X_8888: PixelFormat = PixelFormat(13);

    pub const YCBCR_422_SP: PixelFormat = PixelFormat(0x10);
    pub const YCRCB_420_SP: PixelFormat = PixelFormat(0x11);
    pub const YCBCR_422_I: PixelFormat = PixelFormat(0x14);
    pub const RAW16: PixelFormat = PixelFormat(0x20);
    pub const BLOB: PixelFormat = PixelFormat(0x21);
    pub const IMPLEMENTATION_DEFINED: PixelFormat = PixelFormat(0x22);
    pub const YV12: PixelFormat = PixelFormat(0x3231_5659);

    pub const YCBCR_420_P: PixelFormat = PixelFormat(0x101);
    pub const YCBCR_420_SP: PixelFormat = PixelFormat(0x105);
    pub const YCBCR_420_SP_TILED: PixelFormat = PixelFormat(0x107);
    pub const EXYNOS_YV12: PixelFormat = PixelFormat(0x11c);
    pub const EXYNOS_YCRCB_420_SP: PixelFormat = PixelFormat(0x11d);

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            PixelFormat::RGBA_8888 => "RGBA_8888",
            PixelFormat::RGBX_8888 => "RGBX_8888",
            PixelFormat::RGB_888 => "RGB_888",
            PixelFormat::RGB_565 => "RGB_565",
            PixelFormat::BGRA_8888 => "BGRA_8888",
            PixelFormat::SRGB_A_8888 => "sRGB_A_8888",
            PixelFormat::SRGB_X_8888 => "sRGB_X_8888",
            PixelFormat::YCBCR_422_SP => "YCbCr_422_SP",
            PixelFormat::YCRCB_420_SP => "YCrCb_420_SP",
            PixelFormat::YCBCR_422_I => "YCbCr_422_I",
            PixelFormat::RAW16 => "RAW16",
            PixelFormat::BLOB => "BLOB",
            PixelFormat::IMPLEMENTATION_DEFINED => "IMPLEMENTATION_DEFINED",
            PixelFormat::YV12 => "YV12",
            PixelFormat::YCBCR_420_P => "YCbCr_420_P",
            PixelFormat::YCBCR_420_SP => "YCbCr_420_SP",
            PixelFormat::YCBCR_420_SP_TILED => "YCbCr_420_SP_TILED",
            PixelFormat::EXYNOS_YV12 => "EXYNOS_YV12",
            PixelFormat::EXYNOS_YCRCB_420_SP => "EXYNOS_YCrCb_420_SP",
            _ => return None,
        };
        Some(name)
    }

    /// Returns the bytes per pixel of packed RGB-class formats, `None` for everything else.
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match *self {
            PixelFormat::RGBA_8888
            | PixelFormat::RGBX_8888
            | PixelFormat::BGRA_8888
            | PixelFormat::SRGB_A_8888
            | PixelFormat::SRGB_X_8888 => Some(4),
            PixelFormat::RGB_888 => Some(3),
            PixelFormat::RGB_565 | PixelFormat::RAW16 => Some(2),
            PixelFormat::BLOB => Some(1),
            _ => None,
        }
    }

    /// Returns the number of separately allocated planes a buffer of this format carries.
    pub fn plane_count(&self) -> GrallocResult<usize> {
        if self.bytes_per_pixel().is_some() {
            return Ok(1);
        }

        match *self {
            PixelFormat::YV12 | PixelFormat::YCRCB_420_SP | PixelFormat::YCBCR_422_I => Ok(1),
            PixelFormat::YCBCR_420_SP
            | PixelFormat::EXYNOS_YCRCB_420_SP
            | PixelFormat::YCBCR_420_SP_TILED
            | PixelFormat::YCBCR_422_SP => Ok(2),
            PixelFormat::EXYNOS_YV12 | PixelFormat::YCBCR_420_P => Ok(3),
            _ => Err(GrallocError::InvalidFormat(*self)),
        }
    }

    /// Returns true for YUV formats the framework expects in one contiguous allocation.
    pub fn is_framework_yuv(&self) -> bool {
        matches!(*self, PixelFormat::YV12 | PixelFormat::YCRCB_420_SP)
    }
}

impl From<u32> for PixelFormat {
    fn from(u: u32) -> PixelFormat {
        PixelFormat(u)
    }
}

impl From<PixelFormat> for u32 {
    fn from(f: PixelFormat) -> u32 {
        f.0
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "format({:#x})", self.0),
        }
    }
}

/// What a format rule does when the request also carries CPU access bits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SwUsagePolicy {
    Allow,
    Warn,
    Reject,
}

/// One row of a format resolution table: when `applies` holds for the usage, the generic format
/// becomes `resolved`.
pub struct FormatRule {
    pub consumer: &'static str,
    pub applies: fn(GrallocUsage) -> bool,
    pub resolved: PixelFormat,
    pub sw_usage: SwUsagePolicy,
}

/// The framebuffer and the video encoder can't take RGBA byte order.
pub static RGBA_8888_RULES: [FormatRule; 2] = [
    FormatRule {
        consumer: "framebuffer target",
        applies: GrallocUsage::is_framebuffer,
        resolved: PixelFormat::BGRA_8888,
        sw_usage: SwUsagePolicy::Warn,
    },
    FormatRule {
        consumer: "video encoder input",
        applies: GrallocUsage::is_video_encoder,
        resolved: PixelFormat::BGRA_8888,
        sw_usage: SwUsagePolicy::Reject,
    },
];

/// Checked in order; the first match wins.
pub static IMPLEMENTATION_DEFINED_RULES: [FormatRule; 3] = [
    FormatRule {
        consumer: "zero shutter lag camera",
        applies: GrallocUsage::is_camera_zsl,
        resolved: PixelFormat::YCBCR_422_I,
        sw_usage: SwUsagePolicy::Allow,
    },
    FormatRule {
        consumer: "GPU texture",
        applies: GrallocUsage::is_texture,
        resolved: PixelFormat::EXYNOS_YV12,
        sw_usage: SwUsagePolicy::Allow,
    },
    FormatRule {
        consumer: "video encoder input",
        applies: GrallocUsage::is_video_encoder,
        resolved: PixelFormat::YCBCR_420_SP,
        sw_usage: SwUsagePolicy::Allow,
    },
];

/// Returns the resolution table consulted for `format`.
pub fn format_rules(format: PixelFormat) -> &'static [FormatRule] {
    match format {
        PixelFormat::RGBA_8888 => &RGBA_8888_RULES,
        PixelFormat::IMPLEMENTATION_DEFINED => &IMPLEMENTATION_DEFINED_RULES,
        _ => &[],
    }
}

/// Resolves a generic format into the concrete format that will be allocated.  Formats without
/// a matching rule pass through unchanged, so an unresolved placeholder fails later in the
/// layout calculation.
pub fn resolve_format(format: PixelFormat, usage: GrallocUsage) -> GrallocResult<PixelFormat> {
    let rule = match format_rules(format).iter().find(|rule| (rule.applies)(usage)) {
        Some(rule) => rule,
        None => return Ok(format),
    };

    if usage.has_sw_access() {
        match rule.sw_usage {
            SwUsagePolicy::Allow => (),
            SwUsagePolicy::Warn => {
                warn!("{} should not have SW usage bits; ignoring", rule.consumer)
            }
            SwUsagePolicy::Reject => return Err(GrallocError::InvalidUsage(rule.consumer)),
        }
    }

    debug!(
        "{:?} resolved to {:?} for {}, {:?}",
        format, rule.resolved, rule.consumer, usage
    );
    Ok(rule.resolved)
}

/// Layout of a single-plane RGB-class buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RgbLayout {
    /// Row pitch in pixels.
    pub stride: u32,
    pub bytes_per_row: u32,
    pub bytes_per_pixel: u32,
    pub vstride: u32,
    pub size: u64,
}

/// Layout of a YUV buffer.  Both chroma planes of a three plane format share `chroma_size`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct YuvLayout {
    /// Row pitch in pixels.  One luma sample is one byte, except for packed 4:2:2 where each
    /// pixel takes two bytes.
    pub stride: u32,
    pub vstride: u32,
    pub luma_size: u64,
    pub chroma_size: u64,
    pub planes: usize,
}

fn align(value: u64, alignment: u64) -> GrallocResult<u64> {
    checked_range!(value; <= u64::MAX - alignment)?;
    Ok(align_upwards!(value, alignment))
}

fn check_dimensions(width: u32, height: u32) -> GrallocResult<()> {
    if width == 0 || height == 0 {
        return Err(GrallocError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Rows of padding the display engine may fetch past the last line.
const RGB_PREFETCH_ROWS: u64 = 2;

/// Computes the layout of an RGB-class (or BLOB) buffer.  Other formats are rejected with
/// `InvalidFormat`, which the allocator takes as a cue to try the YUV path.
pub fn rgb_layout(width: u32, height: u32, format: PixelFormat) -> GrallocResult<RgbLayout> {
    let bpp = format
        .bytes_per_pixel()
        .ok_or(GrallocError::InvalidFormat(format))?;
    check_dimensions(width, height)?;

    let w = width as u64;
    let h = height as u64;

    if format == PixelFormat::BLOB {
        let size = checked_arithmetic!(w * h)?;
        return Ok(RgbLayout {
            stride: width,
            bytes_per_row: width,
            bytes_per_pixel: bpp,
            vstride: height,
            size,
        });
    }

    let bytes_per_pixel = bpp as u64;
    let unaligned_row = checked_arithmetic!(w * bytes_per_pixel)?;
    let bytes_per_row = align(unaligned_row, 64)?;
    let vstride = align(h, 16)?;
    let prefetch = RGB_PREFETCH_ROWS;
    let padded_height = checked_arithmetic!(h + prefetch)?;
    let rows = max(vstride, padded_height);
    let size = checked_arithmetic!(bytes_per_row * rows)?;

    Ok(RgbLayout {
        stride: (bytes_per_row / bytes_per_pixel).try_into()?,
        bytes_per_row: bytes_per_row.try_into()?,
        bytes_per_pixel: bpp,
        vstride: vstride.try_into()?,
        size: round_up_to_page_size(size)?,
    })
}

/// Computes the single contiguous layout the framework defines for YV12 and NV21.
pub fn framework_yuv_layout(
    width: u32,
    height: u32,
    format: PixelFormat,
) -> GrallocResult<YuvLayout> {
    check_dimensions(width, height)?;

    let w = width as u64;
    let h = height as u64;
    let (stride, size) = match format {
        PixelFormat::YV12 => {
            let stride = align(w, 16)?;
            let half_stride = stride / 2;
            let chroma_stride = align(half_stride, 16)?;
            let luma_size = checked_arithmetic!(stride * h)?;
            let chroma_size = checked_arithmetic!(chroma_stride * h)?;
            (stride, checked_arithmetic!(luma_size + chroma_size)?)
        }
        PixelFormat::YCRCB_420_SP => {
            let luma_size = checked_arithmetic!(w * h)?;
            let chroma_size = luma_size / 2;
            (w, checked_arithmetic!(luma_size + chroma_size)?)
        }
        _ => return Err(GrallocError::InvalidFormat(format)),
    };

    Ok(YuvLayout {
        stride: stride.try_into()?,
        vstride: height,
        luma_size: size,
        chroma_size: 0,
        planes: 1,
    })
}

/// Computes the per-plane layout of the hardware YUV formats.
pub fn yuv_layout(width: u32, height: u32, format: PixelFormat) -> GrallocResult<YuvLayout> {
    check_dimensions(width, height)?;

    let w = width as u64;
    let h = height as u64;
    let mut stride = align(w, 16)?;

    let (luma_vstride, luma_size, chroma_size, planes) = match format {
        PixelFormat::EXYNOS_YV12 | PixelFormat::YCBCR_420_P => {
            if format == PixelFormat::EXYNOS_YV12 {
                stride = align(w, 32)?;
            }
            let luma_vstride = align(h, 16)?;
            let chroma_vstride = luma_vstride / 2;
            let half_stride = stride / 2;
            let chroma_stride = align(half_stride, 16)?;
            let luma_size = checked_arithmetic!(luma_vstride * stride)?;
            let chroma_size = checked_arithmetic!(chroma_vstride * chroma_stride)?;
            (luma_vstride, luma_size, chroma_size, 3)
        }
        PixelFormat::YCBCR_420_SP | PixelFormat::EXYNOS_YCRCB_420_SP => {
            let luma_vstride = align(h, 16)?;
            let chroma_vstride = luma_vstride / 2;
            let chroma_stride = align(stride, 16)?;
            let luma_size = checked_arithmetic!(luma_vstride * stride)?;
            let chroma_size = checked_arithmetic!(chroma_vstride * chroma_stride)?;
            (luma_vstride, luma_size, chroma_size, 2)
        }
        PixelFormat::YCBCR_420_SP_TILED => {
            let luma_vstride = align(h, 32)?;
            let chroma_vstride = align(h / 2, 32)?;
            let luma_size = checked_arithmetic!(luma_vstride * stride)?;
            let chroma_size = checked_arithmetic!(chroma_vstride * stride)?;
            (luma_vstride, luma_size, chroma_size, 2)
        }
        PixelFormat::YCBCR_422_SP => {
            let plane_size = checked_arithmetic!(stride * h)?;
            (h, plane_size, plane_size, 2)
        }
        PixelFormat::YCBCR_422_I => {
            let bytes_per_pixel = 2u64;
            let row = checked_arithmetic!(stride * bytes_per_pixel)?;
            let luma_size = checked_arithmetic!(row * h)?;
            (h, luma_size, 0, 1)
        }
        _ => return Err(GrallocError::InvalidFormat(format)),
    };

    Ok(YuvLayout {
        stride: stride.try_into()?,
        vstride: luma_vstride.try_into()?,
        luma_size,
        chroma_size,
        planes,
    })
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;
    use crate::usage::*;

    #[test]
    fn format_debug() {
        let mut buf = String::new();
        write!(&mut buf, "{:?}", PixelFormat::EXYNOS_YV12).unwrap();
        assert_eq!(buf, "EXYNOS_YV12");

        let mut buf = String::new();
        write!(&mut buf, "{:?}", PixelFormat(0x7777)).unwrap();
        assert_eq!(buf, "format(0x7777)");
    }

    #[test]
    fn plane_counts() {
        assert_eq!(PixelFormat::RGBA_8888.plane_count().unwrap(), 1);
        assert_eq!(PixelFormat::SRGB_X_8888.plane_count().unwrap(), 1);
        assert_eq!(PixelFormat::YV12.plane_count().unwrap(), 1);
        assert_eq!(PixelFormat::YCBCR_422_I.plane_count().unwrap(), 1);
        assert_eq!(PixelFormat::YCBCR_420_SP.plane_count().unwrap(), 2);
        assert_eq!(PixelFormat::YCBCR_420_SP_TILED.plane_count().unwrap(), 2);
        assert_eq!(PixelFormat::EXYNOS_YV12.plane_count().unwrap(), 3);
        assert!(PixelFormat::IMPLEMENTATION_DEFINED.plane_count().is_err());

        assert!(PixelFormat::YV12.is_framework_yuv());
        assert!(!PixelFormat::EXYNOS_YV12.is_framework_yuv());
    }

    #[test]
    fn rgba_for_framebuffer_becomes_bgra() {
        let usage = GrallocUsage::new(GRALLOC_USAGE_HW_FB);
        assert_eq!(
            resolve_format(PixelFormat::RGBA_8888, usage).unwrap(),
            PixelFormat::BGRA_8888
        );

        // Contradictory, but only worth a warning.
        let usage = usage | GRALLOC_USAGE_SW_WRITE_OFTEN;
        assert_eq!(
            resolve_format(PixelFormat::RGBA_8888, usage).unwrap(),
            PixelFormat::BGRA_8888
        );
    }

    #[test]
    fn rgba_for_encoder_rejects_sw_usage() {
        let usage = GrallocUsage::new(GRALLOC_USAGE_HW_VIDEO_ENCODER);
        assert_eq!(
            resolve_format(PixelFormat::RGBA_8888, usage).unwrap(),
            PixelFormat::BGRA_8888
        );

        let usage = usage | GRALLOC_USAGE_SW_READ_RARELY;
        let err = resolve_format(PixelFormat::RGBA_8888, usage).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn framebuffer_rule_wins_over_encoder_rule() {
        let usage =
            GrallocUsage::new(GRALLOC_USAGE_HW_FB | GRALLOC_USAGE_HW_VIDEO_ENCODER)
                | GRALLOC_USAGE_SW_READ_OFTEN;
        assert_eq!(
            resolve_format(PixelFormat::RGBA_8888, usage).unwrap(),
            PixelFormat::BGRA_8888
        );
    }

    #[test]
    fn implementation_defined_priority() {
        let all = GrallocUsage::new(
            GRALLOC_USAGE_HW_CAMERA_ZSL | GRALLOC_USAGE_HW_TEXTURE | GRALLOC_USAGE_HW_VIDEO_ENCODER,
        );
        let format = PixelFormat::IMPLEMENTATION_DEFINED;
        assert_eq!(resolve_format(format, all).unwrap(), PixelFormat::YCBCR_422_I);

        let no_zsl = GrallocUsage::new(
            GRALLOC_USAGE_HW_CAMERA_WRITE | GRALLOC_USAGE_HW_TEXTURE | GRALLOC_USAGE_HW_VIDEO_ENCODER,
        );
        assert_eq!(resolve_format(format, no_zsl).unwrap(), PixelFormat::EXYNOS_YV12);

        let encoder = GrallocUsage::new(GRALLOC_USAGE_HW_VIDEO_ENCODER);
        assert_eq!(resolve_format(format, encoder).unwrap(), PixelFormat::YCBCR_420_SP);

        let unresolved = GrallocUsage::new(GRALLOC_USAGE_HW_COMPOSER);
        assert_eq!(resolve_format(format, unresolved).unwrap(), format);
        assert!(yuv_layout(64, 64, format).is_err());
    }

    #[test]
    fn other_formats_pass_through() {
        let usage = GrallocUsage::new(GRALLOC_USAGE_HW_FB | GRALLOC_USAGE_HW_VIDEO_ENCODER);
        assert_eq!(
            resolve_format(PixelFormat::RGB_565, usage).unwrap(),
            PixelFormat::RGB_565
        );
        assert!(format_rules(PixelFormat::YV12).is_empty());
    }

    #[test]
    fn rgb_full_hd() {
        let layout = rgb_layout(1920, 1080, PixelFormat::BGRA_8888).unwrap();
        assert_eq!(layout.bytes_per_pixel, 4);
        assert_eq!(layout.bytes_per_row, 7680);
        assert_eq!(layout.stride, 1920);
        assert_eq!(layout.vstride, 1088);
        assert!(layout.size >= 7680 * 1088);
        assert!(layout.stride as u64 * layout.bytes_per_pixel as u64 <= layout.size);
    }

    #[test]
    fn rgb_rows_are_aligned_to_64_bytes() {
        let layout = rgb_layout(10, 10, PixelFormat::RGB_565).unwrap();
        assert_eq!(layout.bytes_per_row, 64);
        assert_eq!(layout.stride, 32);
        assert_eq!(layout.vstride, 16);

        let layout = rgb_layout(30, 7, PixelFormat::RGB_888).unwrap();
        assert_eq!(layout.bytes_per_row, 128);
        assert_eq!(layout.stride, 42);
        assert!(layout.stride * 3 >= 30 * 3);
    }

    #[test]
    fn rgb_reserves_prefetch_rows() {
        // 16 rows are already aligned, but two extra rows are still reserved.
        let layout = rgb_layout(1024, 16, PixelFormat::RGBA_8888).unwrap();
        assert_eq!(layout.vstride, 16);
        assert!(layout.size >= 4096 * 18);
    }

    #[test]
    fn legacy_srgb_formats() {
        let layout = rgb_layout(64, 64, PixelFormat(12)).unwrap();
        assert_eq!(layout.bytes_per_pixel, 4);
        let layout = rgb_layout(64, 64, PixelFormat(13)).unwrap();
        assert_eq!(layout.stride, 64);
    }

    #[test]
    fn blob() {
        let layout = rgb_layout(1000, 1, PixelFormat::BLOB).unwrap();
        assert_eq!(layout.stride, 1000);
        assert_eq!(layout.vstride, 1);
        assert_eq!(layout.size, 1000);
    }

    #[test]
    fn rgb_rejects() {
        match rgb_layout(64, 64, PixelFormat::YV12) {
            Err(GrallocError::InvalidFormat(f)) => assert_eq!(f, PixelFormat::YV12),
            _ => panic!("expected InvalidFormat"),
        }
        match rgb_layout(0, 64, PixelFormat::RGBA_8888) {
            Err(GrallocError::InvalidDimensions { width, height }) => {
                assert_eq!((width, height), (0, 64))
            }
            _ => panic!("expected InvalidDimensions"),
        }
        let err = rgb_layout(u32::MAX, u32::MAX, PixelFormat::RGBA_8888).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn framework_formats() {
        let yv12 = framework_yuv_layout(100, 10, PixelFormat::YV12).unwrap();
        assert_eq!(yv12.stride, 112);
        assert_eq!(yv12.vstride, 10);
        assert_eq!(yv12.luma_size, 112 * 10 + 64 * 10);
        assert_eq!(yv12.planes, 1);

        let nv21 = framework_yuv_layout(100, 10, PixelFormat::YCRCB_420_SP).unwrap();
        assert_eq!(nv21.stride, 100);
        assert_eq!(nv21.luma_size, 1500);

        assert!(framework_yuv_layout(100, 10, PixelFormat::EXYNOS_YV12).is_err());
    }

    #[test]
    fn semi_planar_qcif() {
        let layout = yuv_layout(176, 144, PixelFormat::YCBCR_420_SP).unwrap();
        assert_eq!(layout.stride, 176);
        assert_eq!(layout.vstride, 144);
        assert_eq!(layout.luma_size, 176 * 144);
        assert_eq!(layout.chroma_size, 72 * 176);
        assert_eq!(layout.planes, 2);
    }

    #[test]
    fn three_plane_formats() {
        let layout = yuv_layout(176, 144, PixelFormat::EXYNOS_YV12).unwrap();
        assert_eq!(layout.stride, 192);
        assert_eq!(layout.luma_size, 192 * 144);
        assert_eq!(layout.chroma_size, 72 * 96);
        assert_eq!(layout.planes, 3);

        let layout = yuv_layout(100, 30, PixelFormat::YCBCR_420_P).unwrap();
        assert_eq!(layout.stride, 112);
        assert_eq!(layout.vstride, 32);
        assert_eq!(layout.luma_size, 112 * 32);
        assert_eq!(layout.chroma_size, 16 * 64);
    }

    #[test]
    fn tiled_and_packed_formats() {
        let layout = yuv_layout(100, 30, PixelFormat::YCBCR_420_SP_TILED).unwrap();
        assert_eq!(layout.vstride, 32);
        assert_eq!(layout.luma_size, 32 * 112);
        assert_eq!(layout.chroma_size, 32 * 112);

        let layout = yuv_layout(100, 10, PixelFormat::YCBCR_422_I).unwrap();
        assert_eq!(layout.stride, 112);
        assert_eq!(layout.luma_size, 112 * 2 * 10);
        assert_eq!(layout.chroma_size, 0);
        assert_eq!(layout.planes, 1);

        let layout = yuv_layout(100, 10, PixelFormat::YCBCR_422_SP).unwrap();
        assert_eq!(layout.luma_size, layout.chroma_size);
        assert_eq!(layout.planes, 2);
    }

    #[test]
    fn yuv_stride_covers_width() {
        for width in [1, 15, 16, 17, 1919, 1920] {
            let layout = yuv_layout(width, 8, PixelFormat::YCBCR_420_SP).unwrap();
            assert!(layout.stride >= width);
            assert_eq!(layout.stride % 16, 0);
        }
    }
}
