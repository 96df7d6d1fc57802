// Integration tests
// Run with: cargo test --test integration
// Scylla-backed tests are ignored unless a node is listening on localhost:9042.

mod client_tests;
mod session_tests;
