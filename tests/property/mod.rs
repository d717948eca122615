//! Property-based tests for path handling and the depth bound

mod path_roundtrip;
