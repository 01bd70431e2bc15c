// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! The legacy `/dev/ion` character device.

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Error as IoError;
use std::os::raw::c_int;
use std::os::raw::c_uint;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use log::warn;
use nix::ioctl_readwrite;

use crate::gralloc_os::FromRawDescriptor;
use crate::gralloc_os::SafeDescriptor;
use crate::gralloc_utils::*;
use crate::ion::IonAllocationRequest;
use crate::ion::IonConnection;
use crate::ion::IonDriver;

const ION_IOC_MAGIC: u8 = b'I';
const ION_IOC_ALLOC: u8 = 0;
const ION_IOC_FREE: u8 = 1;
const ION_IOC_SHARE: u8 = 4;

#[allow(non_camel_case_types)]
type ion_user_handle_t = c_int;

#[repr(C)]
#[derive(Copy, Clone)]
#[allow(non_camel_case_types)]
pub struct ion_allocation_data {
    len: usize,
    align: usize,
    heap_id_mask: c_uint,
    flags: c_uint,
    handle: ion_user_handle_t,
}

#[repr(C)]
#[derive(Copy, Clone)]
#[allow(non_camel_case_types)]
pub struct ion_fd_data {
    handle: ion_user_handle_t,
    fd: c_int,
}

#[repr(C)]
#[derive(Copy, Clone)]
#[allow(non_camel_case_types)]
pub struct ion_handle_data {
    handle: ion_user_handle_t,
}

ioctl_readwrite!(ion_alloc, ION_IOC_MAGIC, ION_IOC_ALLOC, ion_allocation_data);
ioctl_readwrite!(ion_free, ION_IOC_MAGIC, ION_IOC_FREE, ion_handle_data);
ioctl_readwrite!(ion_share, ION_IOC_MAGIC, ION_IOC_SHARE, ion_fd_data);

/// Opens connections on an ION device node.
pub struct IonDevice {
    path: PathBuf,
}

impl IonDevice {
    pub const DEFAULT_PATH: &'static str = "/dev/ion";

    pub fn new<P: AsRef<Path>>(path: P) -> IonDevice {
        IonDevice {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for IonDevice {
    fn default() -> IonDevice {
        IonDevice::new(IonDevice::DEFAULT_PATH)
    }
}

impl IonDriver for IonDevice {
    fn connect(&self) -> GrallocResult<Arc<dyn IonConnection>> {
        let fd = OpenOptions::new().read(true).write(true).open(&self.path)?;
        info!("opened ION device {}", self.path.display());
        Ok(Arc::new(IonDeviceConnection { fd }))
    }
}

/// An open ION device.  Closing it releases every kernel handle the connection still owns, but
/// not the shared descriptors already handed out.
pub struct IonDeviceConnection {
    fd: File,
}

impl IonDeviceConnection {
    fn free_handle(&self, handle: ion_user_handle_t) {
        let mut data = ion_handle_data { handle };
        // Safe because the kernel only reads `data`.
        if let Err(e) = unsafe { ion_free(self.fd.as_raw_fd(), &mut data) } {
            warn!("failed to free ION handle {}: {}", handle, e);
        }
    }
}

impl IonConnection for IonDeviceConnection {
    fn alloc_fd(&self, request: &IonAllocationRequest) -> GrallocResult<SafeDescriptor> {
        let mut alloc = ion_allocation_data {
            len: request.len.try_into()?,
            align: request.align.try_into()?,
            heap_id_mask: request.heap_mask.0,
            flags: request.flags.0,
            handle: 0,
        };

        // Safe because the kernel writes no more than size_of::<ion_allocation_data>() bytes.
        unsafe { ion_alloc(self.fd.as_raw_fd(), &mut alloc) }.map_err(|e| {
            GrallocError::KernelAllocFailed {
                len: request.len,
                heap_mask: request.heap_mask.0,
                source: IoError::from(e),
            }
        })?;

        let mut share = ion_fd_data {
            handle: alloc.handle,
            fd: -1,
        };
        // Safe because the kernel writes no more than size_of::<ion_fd_data>() bytes.
        let shared = unsafe { ion_share(self.fd.as_raw_fd(), &mut share) };
        self.free_handle(alloc.handle);
        shared?;

        // Safe because the kernel just created this descriptor and nothing else owns it.
        Ok(unsafe { SafeDescriptor::from_raw_descriptor(share.fd) })
    }
}
