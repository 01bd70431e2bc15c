// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Overflow-checked arithmetic for the layout calculators.  Both macros evaluate to a
//! `GrallocResult` naming the offending operands.

/// `checked_range!(x; <= limit)` fails with `CheckedRange` when `x` exceeds `limit`.
macro_rules! checked_range {
    ($x:expr; <= $limit:expr) => {
        if $x <= $limit {
            Ok(())
        } else {
            Err($crate::GrallocError::CheckedRange {
                field1: (stringify!($x), $x as usize),
                field2: (stringify!($limit), $limit as usize),
            })
        }
    };
}

/// `checked_arithmetic!(a * b)` or `checked_arithmetic!(a + b)` on two identifiers.
macro_rules! checked_arithmetic {
    (@apply $a:ident, $b:ident, $method:ident, $symbol:literal) => {
        $a.$method($b)
            .ok_or_else(|| $crate::GrallocError::CheckedArithmetic {
                field1: (stringify!($a), $a as usize),
                field2: (stringify!($b), $b as usize),
                op: $symbol,
            })
    };
    ($a:ident + $b:ident) => {
        checked_arithmetic!(@apply $a, $b, checked_add, "+")
    };
    ($a:ident * $b:ident) => {
        checked_arithmetic!(@apply $a, $b, checked_mul, "*")
    };
}
