//! Debt records, extra payments and their CSV loaders

mod data;
pub mod loader;

pub use data::{AprType, Debt, ExtraPayment, ExtraPaymentMode};
pub use loader::{load_debts, load_debts_from_reader, load_extra_payments, load_extra_payments_from_reader};
