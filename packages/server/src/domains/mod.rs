// Business domains
pub mod direct_debit;
