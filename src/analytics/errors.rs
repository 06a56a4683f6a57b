use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Numeric overflow while computing {total}")]
    Overflow {
        total: &'static str
    },
    #[error("Amount {amount} of transaction [{transaction_id}] cannot be summed")]
    UnrepresentableAmount {
        transaction_id: String,
        amount: f64
    }
}
