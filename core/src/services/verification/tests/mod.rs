//! Unit tests for the verification module

mod issuer_tests;
