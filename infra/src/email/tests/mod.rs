//! Unit tests for the email module

mod provider_chain_tests;
