//! Unit tests for the attendance services

mod mocks;
