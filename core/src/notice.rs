//! Turning an operation's result into a user-facing notification.
//!
//! The message is generic per operation. A failure never says why, because
//! `ApiError` does not know.

use crate::error::ApiError;
use crate::operation::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: &'static str,
}

impl Notice {
    pub fn success(op: Operation) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: op.success_message(),
        }
    }

    pub fn failure(op: Operation) -> Self {
        Self {
            kind: NoticeKind::Failure,
            title: op.failure_message(),
        }
    }

    pub fn from_result<T>(op: Operation, result: &Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => Self::success(op),
            Err(_) => Self::failure(op),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.kind == NoticeKind::Failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_uses_operation_message() {
        let result: Result<(), ApiError> = Err(ApiError::Failed(Operation::CreateMovie));
        let notice = Notice::from_result(Operation::CreateMovie, &result);
        assert!(notice.is_failure());
        assert_eq!(notice.title, "failed to create movie");
    }

    #[test]
    fn decode_errors_read_the_same_as_rejections() {
        let result: Result<(), ApiError> = Err(ApiError::DeserializationError("eof".to_string()));
        let notice = Notice::from_result(Operation::GetReview, &result);
        assert_eq!(notice, Notice::failure(Operation::GetReview));
    }

    #[test]
    fn success_uses_operation_message() {
        let notice = Notice::from_result(Operation::DeleteReview, &Ok::<(), ApiError>(()));
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.title, "review deleted");
    }
}
