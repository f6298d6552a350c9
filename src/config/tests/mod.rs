//! Unit tests for configuration loading and resolution.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `loading`: Environment and CLI loading through ortho-config
//! - `resolution`: Fallbacks, defaults, and validation in `resolve_with`

mod helpers;
