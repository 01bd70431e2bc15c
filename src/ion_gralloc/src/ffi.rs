// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! C-bindings for the allocator device.  Every entry point returns 0 or a negative errno, and
//! -ESRCH if the call panicked.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::os::raw::c_int;
use std::panic::catch_unwind;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use libc::EINVAL;
use libc::ESRCH;
use log::error;
use once_cell::sync::OnceCell;

use crate::device::GrallocDevice;
use crate::device::GrallocModule;
use crate::device::GrallocModuleBuilder;
use crate::formats::PixelFormat;
use crate::gralloc_utils::GrallocError;
use crate::handle::BufferHandle;
use crate::usage::GrallocUsage;

const NO_ERROR: c_int = 0;

static S_MODULE: OnceCell<Arc<GrallocModule>> = OnceCell::new();

macro_rules! return_on_error {
    ($result:expr) => {
        match $result {
            Ok(t) => t,
            Err(e) => {
                let e = GrallocError::from(e);
                error!("{}", e);
                return e.errno();
            }
        }
    };
}

#[allow(non_camel_case_types)]
type ion_gralloc_device = GrallocDevice;

#[allow(non_camel_case_types)]
type ion_gralloc_handle = BufferHandle;

/// Opens a client of the process-wide module, which allocates from `/dev/ion`.
///
/// # Safety
/// `name` must be null or a null-terminated C-string, and `device_out` must be null or valid for
/// writes.
#[no_mangle]
pub unsafe extern "C" fn ion_gralloc_open(
    name: *const c_char,
    device_out: *mut *mut ion_gralloc_device,
) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if name.is_null() || device_out.is_null() {
            return -EINVAL;
        }

        let name = match CStr::from_ptr(name).to_str() {
            Ok(name) => name,
            Err(_) => return -EINVAL,
        };
        let module = S_MODULE.get_or_init(|| GrallocModuleBuilder::new().build());
        let device = return_on_error!(module.open_device(name));
        *device_out = Box::into_raw(Box::new(device));
        NO_ERROR
    }))
    .unwrap_or(-ESRCH)
}

/// # Safety
/// `dev` must be null or a device returned by `ion_gralloc_open` that wasn't closed yet.
#[no_mangle]
pub unsafe extern "C" fn ion_gralloc_close(dev: *mut ion_gralloc_device) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if dev.is_null() {
            return -EINVAL;
        }

        drop(Box::from_raw(dev));
        NO_ERROR
    }))
    .unwrap_or(-ESRCH)
}

/// Allocates a buffer.  On success `*handle_out` owns the buffer until it is passed to
/// `ion_gralloc_free`, and `*stride_out` holds its stride.
///
/// # Safety
/// `dev` must be null or a live device.  `handle_out` and `stride_out` must be null or valid for
/// writes.
#[no_mangle]
pub unsafe extern "C" fn ion_gralloc_alloc(
    dev: *const ion_gralloc_device,
    width: c_int,
    height: c_int,
    format: c_int,
    usage: c_int,
    handle_out: *mut *mut ion_gralloc_handle,
    stride_out: *mut c_int,
) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if dev.is_null() || handle_out.is_null() || stride_out.is_null() {
            return -EINVAL;
        }

        let width = return_on_error!(u32::try_from(width));
        let height = return_on_error!(u32::try_from(height));
        let (handle, stride) = return_on_error!((*dev).alloc(
            width,
            height,
            PixelFormat(format as u32),
            GrallocUsage(usage as u32)
        ));
        let stride = return_on_error!(c_int::try_from(stride));

        *handle_out = Box::into_raw(Box::new(handle));
        *stride_out = stride;
        NO_ERROR
    }))
    .unwrap_or(-ESRCH)
}

/// Unregisters and releases a buffer.  A handle that fails validation is left untouched.
///
/// # Safety
/// `dev` must be null or a live device.  `handle` must be null or a pointer returned by
/// `ion_gralloc_alloc`; freeing the same handle twice is undefined behavior.
#[no_mangle]
pub unsafe extern "C" fn ion_gralloc_free(
    dev: *const ion_gralloc_device,
    handle: *mut ion_gralloc_handle,
) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if dev.is_null() || handle.is_null() {
            return -EINVAL;
        }

        return_on_error!((*handle).validate());
        let handle = Box::from_raw(handle);
        return_on_error!((*dev).free(*handle));
        NO_ERROR
    }))
    .unwrap_or(-ESRCH)
}

/// Returns the descriptor of `plane`, -1 if the buffer has no such plane, or -EINVAL for a null
/// handle.  The descriptor stays owned by the handle.
///
/// # Safety
/// `handle` must be null or a live handle returned by `ion_gralloc_alloc`.
#[no_mangle]
pub unsafe extern "C" fn ion_gralloc_handle_fd(
    handle: *const ion_gralloc_handle,
    plane: c_int,
) -> c_int {
    catch_unwind(AssertUnwindSafe(|| {
        if handle.is_null() {
            return -EINVAL;
        }

        match usize::try_from(plane) {
            Ok(plane) => (*handle).planes().raw_descriptor(plane),
            Err(_) => -EINVAL,
        }
    }))
    .unwrap_or(-ESRCH)
}

#[cfg(test)]
mod tests {
    use std::ffi::CString;
    use std::ptr::null;
    use std::ptr::null_mut;

    use super::*;
    use crate::testing::FakeIon;
    use crate::testing::FakeMapper;
    use crate::usage::*;

    fn fake_device(ion: &FakeIon) -> GrallocDevice {
        GrallocModuleBuilder::new()
            .set_ion_driver(Box::new(ion.clone()))
            .set_buffer_mapper(Box::new(FakeMapper::new()))
            .build()
            .open_client()
            .unwrap()
    }

    #[test]
    fn null_pointers_are_rejected() {
        let ion = FakeIon::new();
        let device = fake_device(&ion);
        let mut handle: *mut ion_gralloc_handle = null_mut();
        let mut stride: c_int = 0;

        unsafe {
            let rgba = PixelFormat::RGBA_8888.0 as c_int;
            assert_eq!(
                ion_gralloc_alloc(null(), 64, 64, rgba, 0, &mut handle, &mut stride),
                -EINVAL
            );
            assert_eq!(
                ion_gralloc_alloc(&device, 64, 64, rgba, 0, null_mut(), &mut stride),
                -EINVAL
            );
            assert_eq!(
                ion_gralloc_alloc(&device, 64, 64, rgba, 0, &mut handle, null_mut()),
                -EINVAL
            );
            assert_eq!(ion_gralloc_free(&device, null_mut()), -EINVAL);
            assert_eq!(ion_gralloc_close(null_mut()), -EINVAL);
            assert_eq!(ion_gralloc_open(null(), null_mut()), -EINVAL);
            assert_eq!(ion_gralloc_handle_fd(null(), 0), -EINVAL);
        }
        assert!(handle.is_null());
        assert!(ion.requests().is_empty());
    }

    #[test]
    fn negative_dimensions() {
        let ion = FakeIon::new();
        let device = fake_device(&ion);
        let mut handle: *mut ion_gralloc_handle = null_mut();
        let mut stride: c_int = 0;

        let ret = unsafe {
            ion_gralloc_alloc(
                &device,
                -1,
                64,
                PixelFormat::RGBA_8888.0 as c_int,
                0,
                &mut handle,
                &mut stride,
            )
        };
        assert_eq!(ret, -EINVAL);
        assert!(handle.is_null());
    }

    #[test]
    fn alloc_and_free() {
        let ion = FakeIon::new();
        let device = fake_device(&ion);
        let mut handle: *mut ion_gralloc_handle = null_mut();
        let mut stride: c_int = 0;

        unsafe {
            let ret = ion_gralloc_alloc(
                &device,
                176,
                144,
                PixelFormat::IMPLEMENTATION_DEFINED.0 as c_int,
                GRALLOC_USAGE_HW_VIDEO_ENCODER as c_int,
                &mut handle,
                &mut stride,
            );
            assert_eq!(ret, NO_ERROR);
            assert_eq!(stride, 176);
            assert!(ion_gralloc_handle_fd(handle, 0) >= 0);
            assert!(ion_gralloc_handle_fd(handle, 1) >= 0);
            assert_eq!(ion_gralloc_handle_fd(handle, 2), -1);
            assert_eq!(ion.open_descriptors(), 2);

            assert_eq!(ion_gralloc_free(&device, handle), NO_ERROR);
        }
        assert_eq!(ion.open_descriptors(), 0);
    }

    #[test]
    fn kernel_failure_reports_enomem() {
        let ion = FakeIon::new();
        let device = fake_device(&ion);
        ion.fail_on_call(1);
        let mut handle: *mut ion_gralloc_handle = null_mut();
        let mut stride: c_int = 0;

        let ret = unsafe {
            ion_gralloc_alloc(
                &device,
                64,
                64,
                PixelFormat::RGB_565.0 as c_int,
                0,
                &mut handle,
                &mut stride,
            )
        };
        assert_eq!(ret, -libc::ENOMEM);
    }

    #[test]
    fn corrupted_handle_is_left_alone() {
        let ion = FakeIon::new();
        let device = fake_device(&ion);
        let (mut handle, _) = device
            .alloc(64, 64, PixelFormat::RGB_565, GrallocUsage::empty())
            .unwrap();
        handle.magic = 0;

        let raw = Box::into_raw(Box::new(handle));
        unsafe {
            assert_eq!(ion_gralloc_free(&device, raw), -EINVAL);
            // Still ours to release.
            drop(Box::from_raw(raw));
        }
        assert_eq!(ion.open_descriptors(), 0);
    }

    #[test]
    fn unknown_device_name() {
        let name = CString::new("gpu7").unwrap();
        let mut dev: *mut ion_gralloc_device = null_mut();
        let ret = unsafe { ion_gralloc_open(name.as_ptr(), &mut dev) };
        assert_eq!(ret, -EINVAL);
        assert!(dev.is_null());
    }
}
