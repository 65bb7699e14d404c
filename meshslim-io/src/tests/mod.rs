//! Test modules for meshslim-io
//!
//! Parsing is exercised on in-memory text; the file-based tests write to
//! uniquely named temporary files and remove them afterwards.
