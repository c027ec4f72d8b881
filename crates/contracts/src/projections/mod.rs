pub mod p900_intent_audit;
pub mod p901_monthly_sale;
