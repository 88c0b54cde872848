use std::fmt::Display;

/// Log the error side of a result and keep going
pub trait LogError<T> {
    /// Log error with a context message, returning the success value if any
    fn log_error_msg(self, msg: &str) -> Option<T>;
    fn log_error_msg_with<M, F>(self, f: F) -> Option<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;
}

impl<T, E> LogError<T> for Result<T, E>
where
    E: Display,
{
    fn log_error_msg(self, msg: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("{msg}: {e}");
                None
            }
        }
    }
    fn log_error_msg_with<M, F>(self, f: F) -> Option<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        if self.is_ok() {
            return self.ok();
        }
        self.log_error_msg(&f().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_error_msg() {
        let ok: Result<u32, String> = Ok(1);
        assert_eq!(ok.log_error_msg("unused"), Some(1));

        let err: Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.clone().log_error_msg("failed"), None);
        assert_eq!(err.log_error_msg_with(|| format!("failed {}", 2)), None);
    }
}
