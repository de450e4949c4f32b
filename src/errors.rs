use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("student not found: {id}")]
    StudentNotFound {
        id: String,
    },

    #[error("group not found: {id}")]
    GroupNotFound {
        id: i64,
    },

    #[error("group not found: {name}")]
    GroupNameNotFound {
        name: String,
    },

    #[error("student {student} is not enrolled in any group")]
    NotEnrolled {
        student: String,
    },

    #[error("monthly price not found for group {group}")]
    MissingPrice {
        group: String,
    },

    #[error("invalid date {value}: {reason}")]
    InvalidDate {
        value: String,
        reason: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
