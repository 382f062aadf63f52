mod expression;
mod range;

pub use expression::{BuyinClass, classify_buyin, effective_buyin, parse_buyin};
pub use range::BuyinRange;
