mod relay_query;

pub use relay_query::{rewrite_transaction_id, Delivery, RelayOutcome, RelayQueryUseCase};
