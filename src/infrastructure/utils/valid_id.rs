use crate::errors::AppError;

/// Parses a path id as a positive integer; `message` is returned on failure.
/// Only plain ASCII digits are accepted, so `+5` and ` 5` are rejected.
pub fn valid_id(id: &str, message: &str) -> Result<i64, AppError> {
    let invalid = || AppError::InvalidInput(message.to_string());

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    match id.parse::<u32>() {
        Ok(0) | Err(_) => Err(invalid()),
        Ok(value) => Ok(i64::from(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_integers() {
        assert_eq!(valid_id("42", "bad").unwrap(), 42);
        assert_eq!(valid_id("007", "bad").unwrap(), 7);
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-1", "abc", "", "1.5", "99999999999"] {
            assert_eq!(valid_id(raw, "Invalid article ID"), Err(AppError::InvalidInput("Invalid article ID".into())));
        }
    }

    #[test]
    fn rejects_signs_and_surrounding_whitespace() {
        for raw in ["+5", " 5", "5 ", "\t5"] {
            assert_eq!(valid_id(raw, "Invalid image ID"), Err(AppError::InvalidInput("Invalid image ID".into())));
        }
    }
}
