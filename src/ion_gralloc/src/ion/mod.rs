// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! ion: the kernel memory allocator interface.  A driver opens a connection, and a connection
//! turns allocation requests into shareable buffer descriptors.

mod ion_device;
mod memfd;

use std::fmt;
use std::ops::BitOr;
use std::sync::Arc;

pub use ion_device::IonDevice;
pub use ion_device::IonDeviceConnection;
pub use memfd::MemfdConnection;
pub use memfd::MemfdDriver;

use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::GrallocResult;
use crate::usage::GrallocUsage;

pub const ION_HEAP_SYSTEM_ID: u32 = 0;
pub const ION_HEAP_EXYNOS_CONTIG_ID: u32 = 4;
pub const ION_HEAP_CHUNK_ID: u32 = 6;

/// Mappings of the buffer are cached by the CPU.
pub const ION_FLAG_CACHED: u32 = 1;
/// Cache maintenance is done explicitly by the client.
pub const ION_FLAG_CACHED_NEEDS_SYNC: u32 = 2;

/// Protected decoder output routed to the MFC secure region.
pub const ION_EXYNOS_MFC_OUTPUT_MASK: u32 = 1 << 26;
/// Protected scanout routed to the FIMD video region.
pub const ION_EXYNOS_FIMD_VIDEO_MASK: u32 = 1 << 28;

/// Protected RGB buffers must start on a 1 MiB boundary.
pub const SZ_1M: u64 = 1 << 20;

/// The set of ION heaps an allocation may come from.
#[derive(Copy, Clone, Eq, PartialEq, Default)]
pub struct IonHeapMask(pub u32);

impl IonHeapMask {
    /// Returns the mask containing only the heap with `id`.
    #[inline(always)]
    pub fn from_id(id: u32) -> IonHeapMask {
        IonHeapMask(1 << id)
    }
}

impl BitOr for IonHeapMask {
    type Output = IonHeapMask;

    fn bitor(self, rhs: IonHeapMask) -> IonHeapMask {
        IonHeapMask(self.0 | rhs.0)
    }
}

impl fmt::Debug for IonHeapMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "heaps({:#x})", self.0)
    }
}

/// Allocation flags: the caching bits plus the Exynos protected-region selectors.
#[derive(Copy, Clone, Eq, PartialEq, Default)]
pub struct IonFlags(pub u32);

impl IonFlags {
    #[inline(always)]
    pub fn empty() -> IonFlags {
        IonFlags(0)
    }

    #[inline(always)]
    pub fn new(raw: u32) -> IonFlags {
        IonFlags(raw)
    }

    /// Returns the flags to use for `usage`: cached with explicit sync for buffers the CPU reads
    /// often, uncached otherwise.
    pub fn for_usage(usage: GrallocUsage) -> IonFlags {
        if usage.reads_often() {
            IonFlags(ION_FLAG_CACHED | ION_FLAG_CACHED_NEEDS_SYNC)
        } else {
            IonFlags::empty()
        }
    }

    #[inline(always)]
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }
}

impl BitOr<u32> for IonFlags {
    type Output = IonFlags;

    fn bitor(self, rhs: u32) -> IonFlags {
        IonFlags(self.0 | rhs)
    }
}

impl fmt::Debug for IonFlags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "flags({:#x})", self.0)
    }
}

/// Chooses the heaps for a buffer: the physically contiguous Exynos heap for protected content,
/// the system and chunk heaps for everything else.
pub fn select_heap(usage: GrallocUsage) -> IonHeapMask {
    if usage.is_protected() {
        IonHeapMask::from_id(ION_HEAP_EXYNOS_CONTIG_ID)
    } else {
        IonHeapMask::from_id(ION_HEAP_SYSTEM_ID) | IonHeapMask::from_id(ION_HEAP_CHUNK_ID)
    }
}

/// One request for a shareable buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct IonAllocationRequest {
    pub len: u64,
    /// Zero lets the heap choose.
    pub align: u64,
    pub heap_mask: IonHeapMask,
    pub flags: IonFlags,
}

/// An open session with the kernel allocator.
pub trait IonConnection: Send + Sync {
    /// Allocates a buffer and returns a descriptor other processes can map.  The kernel-side
    /// handle is released before returning, so the descriptor is the only reference left.
    fn alloc_fd(&self, request: &IonAllocationRequest) -> GrallocResult<SafeDescriptor>;
}

/// Opens connections to the kernel allocator.
pub trait IonDriver: Send + Sync {
    fn connect(&self) -> GrallocResult<Arc<dyn IonConnection>>;
}
