// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! A crate for allocating graphics buffers out of ION kernel heaps, computing their layout from
//! the requested pixel format and usage, and packaging the resulting dma-buf descriptors into
//! shareable buffer handles.

#[macro_use]
mod macros;

mod alloc;
mod device;
pub mod ffi;
mod formats;
mod gralloc_os;
mod gralloc_utils;
mod handle;
mod ion;
mod mapper;
#[cfg(test)]
mod testing;
mod usage;

pub use crate::device::GrallocDevice;
pub use crate::device::GrallocModule;
pub use crate::device::GrallocModuleBuilder;
pub use crate::device::GRALLOC_HARDWARE_GPU0;
pub use crate::formats::*;
pub use crate::gralloc_os::AsRawDescriptor;
pub use crate::gralloc_os::AsRawDescriptors;
pub use crate::gralloc_os::FromRawDescriptor as GrallocFromRawDescriptor;
pub use crate::gralloc_os::IntoRawDescriptor as GrallocIntoRawDescriptor;
pub use crate::gralloc_os::RawDescriptor;
pub use crate::gralloc_os::SafeDescriptor as GrallocDescriptor;
pub use crate::gralloc_utils::*;
pub use crate::handle::BufferHandle;
pub use crate::handle::BufferMetadata;
pub use crate::handle::ChromaSiting;
pub use crate::handle::ColorMetadata;
pub use crate::handle::Gamut;
pub use crate::handle::NativeHandleInts;
pub use crate::handle::PlaneDescriptors;
pub use crate::handle::MAX_PLANES;
pub use crate::ion::*;
pub use crate::mapper::BufferMapper;
pub use crate::mapper::NullMapper;
pub use crate::usage::*;
