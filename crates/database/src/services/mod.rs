pub mod closing;
pub mod evaluation;
pub mod ledger;
pub mod prerequisites;
