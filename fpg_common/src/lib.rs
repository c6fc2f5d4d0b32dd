mod fee_amount;
mod secret;

pub mod helpers;

pub use fee_amount::{FeeAmount, FeeAmountError, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
