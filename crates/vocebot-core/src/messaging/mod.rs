pub mod port;
pub mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
