//! Property-based tests for the frame model.
