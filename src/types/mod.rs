
pub type TransactionId = String;
pub type AccountId = String;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

pub const TYPE_DEPOSIT: &str = "deposit";
pub const TYPE_WITHDRAWAL: &str = "withdrawal";

/// Returns true when an optional field carries exactly the expected value.
///
/// Statuses and types outside the recognized vocabulary are passed through untouched,
/// so every comparison goes through here rather than an enum.
pub fn is_value(field: Option<&str>, expected: &str) -> bool {
    field == Some(expected)
}
