// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! handle: the shareable buffer handle, owning one descriptor per plane, and its flattened form
//! for transport across processes.

use std::fmt;

use zerocopy::AsBytes;
use zerocopy::FromBytes;

use crate::formats::PixelFormat;
use crate::gralloc_os::AsRawDescriptor;
use crate::gralloc_os::AsRawDescriptors;
use crate::gralloc_os::RawDescriptor;
use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::*;
use crate::usage::GrallocUsage;

/// A buffer never has more than a luma and two chroma planes.
pub const MAX_PLANES: usize = 3;

const BUFFER_HANDLE_MAGIC: u32 = 0x4e4f_4947;

/// Raw value reported for planes a format doesn't have.
const NO_DESCRIPTOR: RawDescriptor = -1;

/// Owns the descriptors of a buffer while it is being assembled.  Dropping a partially filled
/// set closes exactly the descriptors obtained so far.
#[derive(Default)]
pub struct PlaneDescriptors {
    descriptors: [Option<SafeDescriptor>; MAX_PLANES],
    len: usize,
}

impl PlaneDescriptors {
    pub fn new() -> PlaneDescriptors {
        Default::default()
    }

    pub fn push(&mut self, descriptor: SafeDescriptor) -> GrallocResult<()> {
        if self.len == MAX_PLANES {
            return Err(GrallocError::TooManyPlanes(MAX_PLANES));
        }

        self.descriptors[self.len] = Some(descriptor);
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, plane: usize) -> Option<&SafeDescriptor> {
        self.descriptors.get(plane)?.as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SafeDescriptor> {
        self.descriptors.iter().flatten()
    }

    /// Returns the raw descriptor of `plane`, or -1 if the buffer has no such plane.
    pub fn raw_descriptor(&self, plane: usize) -> RawDescriptor {
        self.get(plane)
            .map(|d| d.as_raw_descriptor())
            .unwrap_or(NO_DESCRIPTOR)
    }

    pub fn try_clone(&self) -> GrallocResult<PlaneDescriptors> {
        let mut clone = PlaneDescriptors::new();
        for descriptor in self.iter() {
            clone.push(descriptor.try_clone()?)?;
        }
        Ok(clone)
    }
}

impl AsRawDescriptors for PlaneDescriptors {
    fn as_raw_descriptors(&self) -> Vec<RawDescriptor> {
        self.iter().map(|d| d.as_raw_descriptor()).collect()
    }
}

impl fmt::Debug for PlaneDescriptors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.as_raw_descriptors()).finish()
    }
}

/// Chroma siting standard of a YUV buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ChromaSiting {
    Bt601 = 1,
    Bt709 = 2,
}

/// Quantization range of a YUV buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Gamut {
    Narrow = 1,
    Wide = 2,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ColorMetadata {
    pub chroma: ChromaSiting,
    pub gamut: Gamut,
}

impl ColorMetadata {
    /// BT.601 narrow range when the private chroma bit is set, BT.709 wide range otherwise.
    pub fn for_usage(usage: GrallocUsage) -> ColorMetadata {
        if usage.wants_private_chroma() {
            ColorMetadata {
                chroma: ChromaSiting::Bt601,
                gamut: Gamut::Narrow,
            }
        } else {
            ColorMetadata {
                chroma: ChromaSiting::Bt709,
                gamut: Gamut::Wide,
            }
        }
    }

    fn from_codes(chroma: u32, gamut: u32) -> GrallocResult<Option<ColorMetadata>> {
        let chroma = match chroma {
            0 if gamut == 0 => return Ok(None),
            1 => ChromaSiting::Bt601,
            2 => ChromaSiting::Bt709,
            _ => return Err(GrallocError::InvalidHandle("unknown chroma siting")),
        };
        let gamut = match gamut {
            1 => Gamut::Narrow,
            2 => Gamut::Wide,
            _ => return Err(GrallocError::InvalidHandle("unknown gamut")),
        };
        Ok(Some(ColorMetadata { chroma, gamut }))
    }
}

/// Everything about a buffer except its descriptors.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BufferMetadata {
    /// The resolved format, never a placeholder.
    pub format: PixelFormat,
    pub usage: GrallocUsage,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub vstride: u32,
    pub plane_sizes: [u64; MAX_PLANES],
    pub color: Option<ColorMetadata>,
}

/// An allocated graphics buffer.  Dropping it closes every plane.
pub struct BufferHandle {
    pub(crate) magic: u32,
    planes: PlaneDescriptors,
    meta: BufferMetadata,
}

impl BufferHandle {
    /// Wraps fully allocated planes.  The number of descriptors must match the format.
    pub fn new(planes: PlaneDescriptors, meta: BufferMetadata) -> GrallocResult<BufferHandle> {
        let handle = BufferHandle {
            magic: BUFFER_HANDLE_MAGIC,
            planes,
            meta,
        };
        handle.validate()?;
        Ok(handle)
    }

    /// Checks that this is a handle built by this crate and that it is structurally sound.
    pub fn validate(&self) -> GrallocResult<()> {
        if self.magic != BUFFER_HANDLE_MAGIC {
            return Err(GrallocError::InvalidHandle("bad magic"));
        }

        let planes = self
            .meta
            .format
            .plane_count()
            .map_err(|_| GrallocError::InvalidHandle("unknown format"))?;
        if self.planes.len() != planes {
            return Err(GrallocError::InvalidHandle(
                "descriptor count does not match the format",
            ));
        }

        for plane in 0..planes {
            if self.meta.plane_sizes[plane] == 0 {
                return Err(GrallocError::InvalidHandle("empty plane"));
            }
            if self.planes.raw_descriptor(plane) < 0 {
                return Err(GrallocError::InvalidHandle("negative descriptor"));
            }
        }

        Ok(())
    }

    pub fn planes(&self) -> &PlaneDescriptors {
        &self.planes
    }

    pub fn metadata(&self) -> &BufferMetadata {
        &self.meta
    }

    pub fn format(&self) -> PixelFormat {
        self.meta.format
    }

    pub fn stride(&self) -> u32 {
        self.meta.stride
    }

    pub fn vstride(&self) -> u32 {
        self.meta.vstride
    }

    pub fn total_size(&self) -> u64 {
        self.meta.plane_sizes.iter().sum()
    }

    pub fn color_metadata(&self) -> Option<ColorMetadata> {
        self.meta.color
    }

    pub fn set_color_metadata(&mut self, color: ColorMetadata) {
        self.meta.color = Some(color);
    }

    /// Duplicates every descriptor; the clone is an independent handle to the same memory.
    pub fn try_clone(&self) -> GrallocResult<BufferHandle> {
        Ok(BufferHandle {
            magic: self.magic,
            planes: self.planes.try_clone()?,
            meta: self.meta,
        })
    }

    /// Flattens the metadata into the integer block that travels next to the descriptors.
    pub fn native_ints(&self) -> NativeHandleInts {
        let (chroma, gamut) = match self.meta.color {
            Some(color) => (color.chroma as u32, color.gamut as u32),
            None => (0, 0),
        };

        let mut ints = NativeHandleInts {
            magic: self.magic,
            num_fds: self.planes.len() as u32,
            format: self.meta.format.into(),
            usage: self.meta.usage.into(),
            width: self.meta.width,
            height: self.meta.height,
            stride: self.meta.stride,
            vstride: self.meta.vstride,
            chroma,
            gamut,
            plane_sizes: self.meta.plane_sizes,
            checksum: 0,
            pad: 0,
        };
        ints.checksum = ints.compute_checksum();
        ints
    }

    /// Rebuilds a handle received from another process.  Takes ownership of `fds` and closes
    /// them if the handle doesn't validate.
    pub fn from_native(fds: Vec<SafeDescriptor>, ints: &[u8]) -> GrallocResult<BufferHandle> {
        let ints = NativeHandleInts::read_from(ints)
            .ok_or(GrallocError::InvalidHandle("integer block has the wrong size"))?;

        if ints.magic != BUFFER_HANDLE_MAGIC {
            return Err(GrallocError::InvalidHandle("bad magic"));
        }
        if ints.checksum != ints.compute_checksum() {
            return Err(GrallocError::InvalidHandle("checksum mismatch"));
        }
        if ints.num_fds as usize != fds.len() {
            return Err(GrallocError::InvalidHandle(
                "descriptor count does not match the integer block",
            ));
        }

        let mut planes = PlaneDescriptors::new();
        for fd in fds {
            planes
                .push(fd)
                .map_err(|_| GrallocError::InvalidHandle("too many descriptors"))?;
        }

        let meta = BufferMetadata {
            format: PixelFormat(ints.format),
            usage: GrallocUsage(ints.usage),
            width: ints.width,
            height: ints.height,
            stride: ints.stride,
            vstride: ints.vstride,
            plane_sizes: ints.plane_sizes,
            color: ColorMetadata::from_codes(ints.chroma, ints.gamut)?,
        };
        BufferHandle::new(planes, meta)
    }
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BufferHandle")
            .field("planes", &self.planes)
            .field("meta", &self.meta)
            .finish()
    }
}

/// The integer part of a flattened buffer handle.
#[repr(C)]
#[derive(Copy, Clone, Default, AsBytes, FromBytes)]
pub struct NativeHandleInts {
    pub magic: u32,
    pub num_fds: u32,
    pub format: u32,
    pub usage: u32,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub vstride: u32,
    pub chroma: u32,
    pub gamut: u32,
    pub plane_sizes: [u64; MAX_PLANES],
    /// FNV-1a over the block with this field zeroed.
    pub checksum: u32,
    pub pad: u32,
}

impl NativeHandleInts {
    fn compute_checksum(&self) -> u32 {
        const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
        const FNV_PRIME: u32 = 0x0100_0193;

        let mut block = *self;
        block.checksum = 0;
        block
            .as_bytes()
            .iter()
            .fold(FNV_OFFSET_BASIS, |hash, byte| {
                (hash ^ *byte as u32).wrapping_mul(FNV_PRIME)
            })
    }
}
