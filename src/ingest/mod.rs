mod transaction_feed;

pub use transaction_feed::TransactionFeed;
