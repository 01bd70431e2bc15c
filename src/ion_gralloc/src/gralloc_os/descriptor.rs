// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::fs::File;
use std::mem;

use crate::gralloc_os::RawDescriptor;

/// An owned descriptor, closed on drop.
///
/// Every plane of a buffer is held in one of these, so an allocation that fails halfway releases
/// the planes it already obtained simply by dropping them.
pub struct SafeDescriptor {
    pub(crate) descriptor: RawDescriptor,
}

/// Gives up ownership of a descriptor; the caller becomes responsible for closing it.
pub trait IntoRawDescriptor {
    fn into_raw_descriptor(self) -> RawDescriptor;
}

/// Borrows the raw descriptor of an owner.
pub trait AsRawDescriptor {
    /// The descriptor is only guaranteed to be open while the owner is.  To hand a buffer to
    /// another process, duplicate it first with [`SafeDescriptor::try_clone`].
    fn as_raw_descriptor(&self) -> RawDescriptor;
}

/// Borrows every raw descriptor of a multi-descriptor owner such as a multi-plane buffer, in
/// plane order.
pub trait AsRawDescriptors {
    fn as_raw_descriptors(&self) -> Vec<RawDescriptor>;
}

pub trait FromRawDescriptor {
    /// # Safety
    /// `descriptor` must be open and owned by nobody else.
    unsafe fn from_raw_descriptor(descriptor: RawDescriptor) -> Self;
}

impl AsRawDescriptor for SafeDescriptor {
    fn as_raw_descriptor(&self) -> RawDescriptor {
        self.descriptor
    }
}

impl<T> AsRawDescriptors for T
where
    T: AsRawDescriptor,
{
    fn as_raw_descriptors(&self) -> Vec<RawDescriptor> {
        vec![self.as_raw_descriptor()]
    }
}

impl IntoRawDescriptor for SafeDescriptor {
    fn into_raw_descriptor(self) -> RawDescriptor {
        let descriptor = self.descriptor;
        mem::forget(self);
        descriptor
    }
}

impl FromRawDescriptor for SafeDescriptor {
    unsafe fn from_raw_descriptor(descriptor: RawDescriptor) -> Self {
        SafeDescriptor { descriptor }
    }
}

impl From<File> for SafeDescriptor {
    fn from(f: File) -> SafeDescriptor {
        // Safe because we own the File at this point.
        unsafe { SafeDescriptor::from_raw_descriptor(f.into_raw_descriptor()) }
    }
}
