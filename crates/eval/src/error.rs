// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Evaluator errors.
use thiserror::Error;

use crate::artifact::Version;

/// Errors returned when loading, saving, or querying evaluator tables.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error while reading or writing a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a table of the expected type.
    #[error("bad magic {found:?}, expected {expected:?}")]
    BadMagic {
        /// The expected magic bytes.
        expected: [u8; 4],
        /// The magic bytes found in the file.
        found: [u8; 4],
    },
    /// The table was written by an incompatible version.
    #[error("version mismatch: expected {expected} found {found}")]
    VersionMismatch {
        /// The version supported by this library.
        expected: Version,
        /// The version found in the file.
        found: Version,
    },
    /// The table checksum does not match its content.
    #[error("table checksum mismatch")]
    Corrupted,
    /// The hand size is not 5, 6, or 7.
    #[error("unsupported hand size {0}")]
    UnsupportedHandSize(usize),
    /// The table content is not a valid state table.
    #[error("invalid table: {0}")]
    InvalidTable(String),
    /// The hand rank is not in the ordinal table.
    #[error("hand rank 0x{0:08x} not found")]
    RankNotFound(u32),
}

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, Error>;
