use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_PAYMENT_METHOD: &str = "any";
pub const DEFAULT_MERCHANT_NAME: &str = "HospiSmart Hotel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    Ready,
}

/// What the gateway asks the terminal to charge.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
}

/// Card details reported by the terminal after a successful charge.
#[derive(Debug, Clone, PartialEq)]
pub struct CardAuthorization {
    pub card_type: String,
    pub card_number_masked: String,
}

/// A completed payment. Only ever lives inside a response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub card_type: String,
    #[serde(rename = "cardNumber")]
    pub card_number_masked: String,
    pub payment_method: String,
    pub timestamp: String,
    pub receipt_printed: bool,
}

/// Result of `processPayment`, discriminated by the `status` field on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PaymentOutcome {
    Success(TransactionRecord),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub card_type: Option<String>,
    pub card_number: Option<String>,
    pub merchant_name: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_success_outcome_is_flat_with_status() {
        let outcome = PaymentOutcome::Success(TransactionRecord {
            transaction_id: "TXN17000000000000000".to_string(),
            amount: dec!(12.50),
            currency: "EUR".to_string(),
            card_type: "VISA".to_string(),
            card_number_masked: "************1234".to_string(),
            payment_method: "card".to_string(),
            timestamp: "2026-10-16T10:00:00".to_string(),
            receipt_printed: false,
        });

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "success");
        assert_eq!(value["amount"], json!(12.5));
        assert_eq!(value["cardNumber"], "************1234");
        assert_eq!(value["receiptPrinted"], false);
    }

    #[test]
    fn test_error_outcome_shape() {
        let outcome = PaymentOutcome::Error {
            message: "Card declined".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"status": "error", "message": "Card declined"})
        );
    }
}
