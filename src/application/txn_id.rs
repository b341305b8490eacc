use chrono::Utc;

/// Builds transaction identifiers of the form `TXN<millis><4 digits>`.
///
/// The suffix is `millis % 10000`, zero-padded. Calls in the same
/// millisecond collide, which is acceptable for terminal-side references.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransactionIdGenerator;

impl TransactionIdGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> String {
        self.generate_at(Utc::now().timestamp_millis())
    }

    pub fn generate_at(&self, millis: i64) -> String {
        format!("TXN{millis}{:04}", millis.rem_euclid(10_000))
    }
}
