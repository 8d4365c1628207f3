use crate::utils::error::{KeywordError, Result};

/// 兩個服務單次請求的上限
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Splits `keywords` into consecutive batches of at most `size` items.
/// Only the last batch can be shorter.
pub fn make_batches(keywords: &[String], size: usize) -> Result<Vec<&[String]>> {
    if size == 0 {
        return Err(KeywordError::InvalidConfigValueError {
            field: "batch_size".to_string(),
            value: size.to_string(),
            reason: "Batch size must be at least 1".to_string(),
        });
    }
    Ok(keywords.chunks(size).collect())
}
