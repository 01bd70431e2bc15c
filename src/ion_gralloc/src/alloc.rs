// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! alloc: turns a (width, height, format, usage) request into kernel allocations and a buffer
//! handle.  RGB-class formats are tried first; anything the RGB path rejects as an invalid
//! argument gets a second chance on the YUV path.

use log::debug;
use log::error;

use crate::formats::*;
use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::*;
use crate::handle::BufferHandle;
use crate::handle::BufferMetadata;
use crate::handle::ColorMetadata;
use crate::handle::PlaneDescriptors;
use crate::handle::MAX_PLANES;
use crate::ion::*;
use crate::usage::GrallocUsage;

fn alloc_plane(
    connection: &dyn IonConnection,
    request: &IonAllocationRequest,
    format: PixelFormat,
    plane: usize,
) -> GrallocResult<SafeDescriptor> {
    connection.alloc_fd(request).map_err(|e| {
        error!(
            "failed to allocate plane {} of a {:?} buffer ({:?}): {}",
            plane, format, request, e
        );
        e
    })
}

/// Allocates a single-plane RGB-class buffer.  Returns the handle and its stride in pixels.
pub(crate) fn alloc_rgb(
    connection: &dyn IonConnection,
    width: u32,
    height: u32,
    format: PixelFormat,
    usage: GrallocUsage,
    flags: IonFlags,
) -> GrallocResult<(BufferHandle, u32)> {
    if format.bytes_per_pixel().is_none() {
        return Err(GrallocError::InvalidFormat(format));
    }

    let format = resolve_format(format, usage)?;
    let layout = rgb_layout(width, height, format)?;

    let mut request = IonAllocationRequest {
        len: layout.size,
        align: 0,
        heap_mask: select_heap(usage),
        flags,
    };
    if usage.is_protected() {
        request.align = SZ_1M;
        request.flags = flags | ION_EXYNOS_FIMD_VIDEO_MASK;
    }

    let mut planes = PlaneDescriptors::new();
    planes.push(alloc_plane(connection, &request, format, 0)?)?;

    let meta = BufferMetadata {
        format,
        usage,
        width,
        height,
        stride: layout.stride,
        vstride: layout.vstride,
        plane_sizes: [layout.size, 0, 0],
        color: None,
    };
    Ok((BufferHandle::new(planes, meta)?, layout.stride))
}

/// Allocates YV12 or NV21 as the framework lays them out: one contiguous buffer.
pub(crate) fn alloc_framework_yuv(
    connection: &dyn IonConnection,
    width: u32,
    height: u32,
    format: PixelFormat,
    usage: GrallocUsage,
    flags: IonFlags,
) -> GrallocResult<(BufferHandle, u32)> {
    let layout = framework_yuv_layout(width, height, format)?;
    let request = IonAllocationRequest {
        len: layout.luma_size,
        align: 0,
        heap_mask: select_heap(usage),
        flags,
    };

    let mut planes = PlaneDescriptors::new();
    planes.push(alloc_plane(connection, &request, format, 0)?)?;

    let meta = BufferMetadata {
        format,
        usage,
        width,
        height,
        stride: layout.stride,
        vstride: layout.vstride,
        plane_sizes: [layout.luma_size, 0, 0],
        color: Some(ColorMetadata::for_usage(usage)),
    };
    Ok((BufferHandle::new(planes, meta)?, layout.stride))
}

/// Allocates a YUV buffer with one descriptor per plane.  If any plane fails, the planes already
/// allocated by this call are closed before the error is returned.
pub(crate) fn alloc_yuv(
    connection: &dyn IonConnection,
    width: u32,
    height: u32,
    format: PixelFormat,
    usage: GrallocUsage,
    flags: IonFlags,
) -> GrallocResult<(BufferHandle, u32)> {
    let format = resolve_format(format, usage)?;
    if format.is_framework_yuv() {
        return alloc_framework_yuv(connection, width, height, format, usage, flags);
    }

    let layout = yuv_layout(width, height, format)?;
    let flags = if usage.is_protected() {
        flags | ION_EXYNOS_MFC_OUTPUT_MASK
    } else {
        flags
    };

    let sizes = [layout.luma_size, layout.chroma_size, layout.chroma_size];
    let mut plane_sizes = [0; MAX_PLANES];
    let mut planes = PlaneDescriptors::new();
    for plane in 0..layout.planes {
        let request = IonAllocationRequest {
            len: sizes[plane],
            align: 0,
            heap_mask: select_heap(usage),
            flags,
        };
        planes.push(alloc_plane(connection, &request, format, plane)?)?;
        plane_sizes[plane] = sizes[plane];
    }

    let meta = BufferMetadata {
        format,
        usage,
        width,
        height,
        stride: layout.stride,
        vstride: layout.vstride,
        plane_sizes,
        color: None,
    };
    let mut handle = BufferHandle::new(planes, meta)?;
    handle.set_color_metadata(ColorMetadata::for_usage(usage));
    Ok((handle, layout.stride))
}

/// Allocates a buffer on whichever path accepts the format.
pub(crate) fn allocate(
    connection: &dyn IonConnection,
    width: u32,
    height: u32,
    format: PixelFormat,
    usage: GrallocUsage,
) -> GrallocResult<(BufferHandle, u32)> {
    let flags = IonFlags::for_usage(usage);

    match alloc_rgb(connection, width, height, format, usage, flags) {
        Err(e) if e.kind() == ErrorKind::InvalidArgument => {
            debug!("RGB path declined {:?}: {}; trying YUV", format, e);
            alloc_yuv(connection, width, height, format, usage, flags)
        }
        result => result,
    }
}
