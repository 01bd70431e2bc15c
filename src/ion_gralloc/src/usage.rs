// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! usage: Android gralloc usage bits.  The numeric values are part of the ABI that pre-built
//! clients rely on and must never change.

use std::fmt;
use std::ops::BitOr;

pub const GRALLOC_USAGE_SW_READ_NEVER: u32 = 0x0000_0000;
pub const GRALLOC_USAGE_SW_READ_RARELY: u32 = 0x0000_0002;
pub const GRALLOC_USAGE_SW_READ_OFTEN: u32 = 0x0000_0003;
pub const GRALLOC_USAGE_SW_READ_MASK: u32 = 0x0000_000f;

pub const GRALLOC_USAGE_SW_WRITE_NEVER: u32 = 0x0000_0000;
pub const GRALLOC_USAGE_SW_WRITE_RARELY: u32 = 0x0000_0020;
pub const GRALLOC_USAGE_SW_WRITE_OFTEN: u32 = 0x0000_0030;
pub const GRALLOC_USAGE_SW_WRITE_MASK: u32 = 0x0000_00f0;

pub const GRALLOC_USAGE_HW_TEXTURE: u32 = 0x0000_0100;
pub const GRALLOC_USAGE_HW_RENDER: u32 = 0x0000_0200;
pub const GRALLOC_USAGE_HW_2D: u32 = 0x0000_0400;
pub const GRALLOC_USAGE_HW_COMPOSER: u32 = 0x0000_0800;
pub const GRALLOC_USAGE_HW_FB: u32 = 0x0000_1000;
pub const GRALLOC_USAGE_PROTECTED: u32 = 0x0000_4000;
pub const GRALLOC_USAGE_HW_VIDEO_ENCODER: u32 = 0x0001_0000;
pub const GRALLOC_USAGE_HW_CAMERA_WRITE: u32 = 0x0002_0000;
pub const GRALLOC_USAGE_HW_CAMERA_READ: u32 = 0x0004_0000;
/// Zero shutter lag: the camera both writes and reads the buffer.
pub const GRALLOC_USAGE_HW_CAMERA_ZSL: u32 = 0x0006_0000;

pub const GRALLOC_USAGE_PRIVATE_0: u32 = 0x1000_0000;
pub const GRALLOC_USAGE_PRIVATE_1: u32 = 0x2000_0000;
pub const GRALLOC_USAGE_PRIVATE_2: u32 = 0x4000_0000;
pub const GRALLOC_USAGE_PRIVATE_3: u32 = 0x8000_0000;
pub const GRALLOC_USAGE_PRIVATE_MASK: u32 = 0xf000_0000;

/// Requests BT.601 narrow-range color metadata on YUV buffers.
pub const GRALLOC_USAGE_PRIVATE_CHROMA: u32 = GRALLOC_USAGE_PRIVATE_0;

/// Usage flags attached to an allocation request.
#[derive(Copy, Clone, Eq, PartialEq, Default)]
pub struct GrallocUsage(pub u32);

impl GrallocUsage {
    /// Returns empty set of flags.
    #[inline(always)]
    pub fn empty() -> GrallocUsage {
        GrallocUsage(0)
    }

    /// Returns the given set of raw `GRALLOC_USAGE` flags wrapped in a GrallocUsage struct.
    #[inline(always)]
    pub fn new(raw: u32) -> GrallocUsage {
        GrallocUsage(raw)
    }

    /// Returns true if any bit of `mask` is set.
    #[inline(always)]
    pub fn intersects(self, mask: u32) -> bool {
        self.0 & mask != 0
    }

    /// Returns true if every bit of `mask` is set.
    #[inline(always)]
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Returns true if the CPU will read or write the buffer.
    #[inline(always)]
    pub fn has_sw_access(self) -> bool {
        self.intersects(GRALLOC_USAGE_SW_READ_MASK | GRALLOC_USAGE_SW_WRITE_MASK)
    }

    /// Returns true if the read intent is exactly "read often".  Rare reads don't qualify.
    #[inline(always)]
    pub fn reads_often(self) -> bool {
        self.0 & GRALLOC_USAGE_SW_READ_MASK == GRALLOC_USAGE_SW_READ_OFTEN
    }

    /// Returns true if the buffer will hold protected content.
    #[inline(always)]
    pub fn is_protected(self) -> bool {
        self.intersects(GRALLOC_USAGE_PROTECTED)
    }

    /// Returns true if the buffer is a framebuffer target.
    #[inline(always)]
    pub fn is_framebuffer(self) -> bool {
        self.intersects(GRALLOC_USAGE_HW_FB)
    }

    /// Returns true if the buffer feeds the hardware video encoder.
    #[inline(always)]
    pub fn is_video_encoder(self) -> bool {
        self.intersects(GRALLOC_USAGE_HW_VIDEO_ENCODER)
    }

    /// Returns true if the buffer is sampled as a GPU texture.
    #[inline(always)]
    pub fn is_texture(self) -> bool {
        self.intersects(GRALLOC_USAGE_HW_TEXTURE)
    }

    /// Returns true if both camera bits are set.
    #[inline(always)]
    pub fn is_camera_zsl(self) -> bool {
        self.contains(GRALLOC_USAGE_HW_CAMERA_ZSL)
    }

    /// Returns true if BT.601 narrow-range metadata was requested.
    #[inline(always)]
    pub fn wants_private_chroma(self) -> bool {
        self.intersects(GRALLOC_USAGE_PRIVATE_CHROMA)
    }
}

impl From<u32> for GrallocUsage {
    fn from(u: u32) -> GrallocUsage {
        GrallocUsage(u)
    }
}

impl From<GrallocUsage> for u32 {
    fn from(u: GrallocUsage) -> u32 {
        u.0
    }
}

impl BitOr<u32> for GrallocUsage {
    type Output = GrallocUsage;

    fn bitor(self, rhs: u32) -> GrallocUsage {
        GrallocUsage(self.0 | rhs)
    }
}

impl fmt::Debug for GrallocUsage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "usage({:#x})", self.0)
    }
}
