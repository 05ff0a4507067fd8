//! Unit tests for verification storage
