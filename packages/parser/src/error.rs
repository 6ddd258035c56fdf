use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Nesting too deep at {pos}: limit is {limit}")]
    NestingTooDeep { pos: usize, limit: usize },

    #[error("Invalid range {from}..{to}: {message}")]
    InvalidRange {
        from: usize,
        to: usize,
        message: String,
    },
}

impl ParseError {
    pub fn nesting_too_deep(pos: usize, limit: usize) -> Self {
        Self::NestingTooDeep { pos, limit }
    }

    pub fn invalid_range(from: usize, to: usize, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            from,
            to,
            message: message.into(),
        }
    }
}
