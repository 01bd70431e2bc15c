// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! gralloc_utils: Error types and results shared by the rest of the crate.

use std::ffi::NulError;
use std::io::Error as IoError;
use std::num::TryFromIntError;

use libc::EINVAL;
use libc::EIO;
use libc::ENOMEM;
#[cfg(unix)]
use nix::Error as NixError;
use remain::sorted;
use thiserror::Error;

use crate::formats::PixelFormat;

/// Coarse classification of a `GrallocError`, matching the status codes the graphics stack
/// understands.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad dimensions or an unsupported format or usage combination.
    InvalidArgument,
    /// The kernel heap could not satisfy an allocation.
    ResourceExhausted,
    /// A buffer handle failed validation.
    InvalidHandle,
    /// An OS or collaborator error carrying its own errno.
    Io,
}

/// An error generated while using this crate.
#[sorted]
#[derive(Error, Debug)]
pub enum GrallocError {
    /// Checked Arithmetic error
    #[error("arithmetic failed: {}({}) {op} {}({})", .field1.0, .field1.1, .field2.0, .field2.1)]
    CheckedArithmetic {
        field1: (&'static str, usize),
        field2: (&'static str, usize),
        op: &'static str,
    },
    /// Checked Range error
    #[error("range check failed: {}({}) vs {}({})", .field1.0, .field1.1, .field2.0, .field2.1)]
    CheckedRange {
        field1: (&'static str, usize),
        field2: (&'static str, usize),
    },
    /// The requested device is not served by this module.
    #[error("client name {0} is not gpu0")]
    InvalidDeviceName(String),
    /// Invalid buffer dimensions.
    #[error("invalid buffer dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// The format is not supported by the allocation path.
    #[error("invalid pixel format {0:?}")]
    InvalidFormat(PixelFormat),
    /// A buffer handle failed validation.
    #[error("invalid buffer handle: {0}")]
    InvalidHandle(&'static str),
    /// The usage flags contradict the requested format.
    #[error("software access is not allowed for {0}")]
    InvalidUsage(&'static str),
    /// An input/output error occured.
    #[error("an input/output error occur: {0}")]
    IoError(IoError),
    /// The kernel heap could not satisfy the allocation.
    #[error("kernel allocation of {len} bytes from heap mask {heap_mask:#x} failed: {source}")]
    KernelAllocFailed {
        len: u64,
        heap_mask: u32,
        source: IoError,
    },
    /// The buffer mapper rejected the buffer with the given errno.
    #[error("buffer mapper failed with error {0}")]
    MapperFailed(i32),
    /// Nix crate error.
    #[cfg(unix)]
    #[error("The errno is {0}")]
    NixError(NixError),
    #[error("Nul Error occured {0}")]
    NulError(NulError),
    /// Violation of an internal invariant occured.
    #[error("violation of a gralloc invariant: {0}")]
    SpecViolation(&'static str),
    /// More descriptors than a buffer can hold.
    #[error("a buffer holds at most {0} planes")]
    TooManyPlanes(usize),
    /// An attempted integer conversion failed.
    #[error("int conversion failed: {0}")]
    TryFromIntError(TryFromIntError),
}

impl GrallocError {
    /// Returns the broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GrallocError::KernelAllocFailed { .. } => ErrorKind::ResourceExhausted,
            GrallocError::InvalidHandle(_) => ErrorKind::InvalidHandle,
            GrallocError::IoError(_) | GrallocError::MapperFailed(_) => ErrorKind::Io,
            #[cfg(unix)]
            GrallocError::NixError(_) => ErrorKind::Io,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Returns the negative status code reported to C callers.
    pub fn errno(&self) -> i32 {
        match self {
            GrallocError::IoError(e) => -e.raw_os_error().unwrap_or(EIO),
            GrallocError::MapperFailed(ret) if *ret < 0 => *ret,
            GrallocError::MapperFailed(_) => -EIO,
            #[cfg(unix)]
            GrallocError::NixError(e) => -(*e as i32),
            _ => match self.kind() {
                ErrorKind::ResourceExhausted => -ENOMEM,
                _ => -EINVAL,
            },
        }
    }
}

#[cfg(unix)]
impl From<NixError> for GrallocError {
    fn from(e: NixError) -> GrallocError {
        GrallocError::NixError(e)
    }
}

impl From<NulError> for GrallocError {
    fn from(e: NulError) -> GrallocError {
        GrallocError::NulError(e)
    }
}

impl From<IoError> for GrallocError {
    fn from(e: IoError) -> GrallocError {
        GrallocError::IoError(e)
    }
}

impl From<TryFromIntError> for GrallocError {
    fn from(e: TryFromIntError) -> GrallocError {
        GrallocError::TryFromIntError(e)
    }
}

/// The result of an operation in this crate.
pub type GrallocResult<T> = std::result::Result<T, GrallocError>;
