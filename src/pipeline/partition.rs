//! Wallet list partitioning into fixed-size scopes

use crate::config::ConfigError;

/// Split `items` into consecutive scopes of `scope_size`
///
/// Every scope holds exactly `scope_size` items except the last, which holds
/// the remainder. Concatenating the scopes reproduces `items`.
pub fn split_into_scopes<T>(items: &[T], scope_size: usize) -> Result<Vec<&[T]>, ConfigError> {
    if scope_size == 0 {
        return Err(ConfigError::InvalidValue(
            "scope size must be positive".to_string(),
        ));
    }

    Ok(items.chunks(scope_size).collect())
}
