// ABOUTME: Test helper modules shared by integration tests
// ABOUTME: HTTP request driving for axum routers

pub mod axum_test;
