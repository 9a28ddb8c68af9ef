//! Synthetic Sample Generator
//!
//! Produces attribute records biased toward fraudulent or legitimate ranges,
//! plus the presentation metadata the dashboard lists next to a score
//! (addresses, amounts, gas, timestamps). Demo and test data only.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::types::{TransactionFeatures, TransactionStatus, TransactionType};

/// Token labels drawn for legitimate samples
pub const MAINSTREAM_TOKENS: [&str; 4] = ["Bitcoin", "Ethereum", "USDT", "USDC"];

/// Synthetic timestamps fall within this many days before "now"
pub const TIMESTAMP_WINDOW_DAYS: i64 = 30;

/// Share of synthetic transactions reported as confirmed
const CONFIRMED_RATE: f64 = 0.9;

pub struct SampleGenerator<R: Rng = StdRng> {
    rng: R,
}

impl SampleGenerator<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible generator for tests and demos
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SampleGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// `low + U[0,1) * span`
    fn uniform(&mut self, low: f64, span: f64) -> f64 {
        low + self.rng.gen::<f64>() * span
    }

    /// Whole-number variant of [`Self::uniform`]
    fn whole(&mut self, low: f64, span: f64) -> f64 {
        self.uniform(low, span).floor()
    }

    fn pick<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }

    /// Bernoulli draw; `p` outside [0, 1] is clamped
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Attribute record drawn from fraudulent or legitimate ranges
    pub fn generate_sample_transaction(&mut self, is_fraudulent: bool) -> TransactionFeatures {
        if is_fraudulent {
            let sent_token = if self.chance(0.5) { "Unknown" } else { "Suspicious" };
            let rec_token = if self.chance(0.5) { "None" } else { "Unknown" };

            TransactionFeatures {
                avg_min_between_sent_tnx: Some(self.uniform(500.0, 1000.0)),
                avg_min_between_received_tnx: Some(self.uniform(1000.0, 2000.0)),
                time_diff_between_first_and_last: Some(self.uniform(100_000.0, 200_000.0)),
                sent_tnx: Some(self.whole(200.0, 500.0)),
                received_tnx: Some(self.whole(50.0, 100.0)),
                unique_received_from_addresses: Some(self.whole(10.0, 50.0)),
                unique_sent_to_addresses: Some(self.whole(50.0, 100.0)),
                total_erc20_tnxs: Some(self.whole(150.0, 300.0)),
                erc20_total_ether_received: Some(self.uniform(500_000.0, 1_000_000.0)),
                erc20_total_ether_sent: Some(self.uniform(600_000.0, 1_200_000.0)),
                erc20_uniq_rec_addr: Some(self.whole(25.0, 40.0)),
                erc20_uniq_sent_addr: Some(self.whole(15.0, 30.0)),
                erc20_uniq_rec_contract_addr: Some(self.whole(10.0, 20.0)),
                max_value_received: Some(self.uniform(500.0, 1000.0)),
                avg_value_received: Some(self.uniform(10.0, 100.0)),
                min_value_sent: Some(self.uniform(1.0, 5.0)),
                erc20_most_sent_token_type: Some(sent_token.to_string()),
                erc20_most_rec_token_type: Some(rec_token.to_string()),
                ..Default::default()
            }
        } else {
            TransactionFeatures {
                avg_min_between_sent_tnx: Some(self.uniform(100.0, 500.0)),
                avg_min_between_received_tnx: Some(self.uniform(200.0, 1000.0)),
                time_diff_between_first_and_last: Some(self.uniform(10_000.0, 50_000.0)),
                sent_tnx: Some(self.whole(10.0, 100.0)),
                received_tnx: Some(self.whole(5.0, 50.0)),
                unique_received_from_addresses: Some(self.whole(3.0, 20.0)),
                unique_sent_to_addresses: Some(self.whole(5.0, 30.0)),
                total_erc20_tnxs: Some(self.whole(5.0, 50.0)),
                erc20_total_ether_received: Some(self.uniform(10_000.0, 100_000.0)),
                erc20_total_ether_sent: Some(self.uniform(12_000.0, 120_000.0)),
                erc20_uniq_rec_addr: Some(self.whole(2.0, 15.0)),
                erc20_uniq_sent_addr: Some(self.whole(1.0, 10.0)),
                erc20_uniq_rec_contract_addr: Some(self.whole(1.0, 5.0)),
                max_value_received: Some(self.uniform(10.0, 100.0)),
                avg_value_received: Some(self.uniform(5.0, 50.0)),
                min_value_sent: Some(self.uniform(1.0, 10.0)),
                erc20_most_sent_token_type: Some(self.pick(&MAINSTREAM_TOKENS).to_string()),
                erc20_most_rec_token_type: Some(self.pick(&MAINSTREAM_TOKENS).to_string()),
                ..Default::default()
            }
        }
    }

    /// `0x` followed by 40 lowercase hex digits
    pub fn random_address(&mut self) -> String {
        let bytes: [u8; 20] = self.rng.gen();
        format!("0x{}", hex::encode(bytes))
    }

    /// Batch id: 8 random hex digits then the zero-padded batch index
    pub fn transaction_id(&mut self, index: usize) -> String {
        format!("0x{:08x}{:04}", self.rng.gen::<u32>(), index)
    }

    /// Standalone id: 12 random hex digits
    pub fn single_transaction_id(&mut self) -> String {
        format!("0x{:012x}", self.rng.gen_range(0u64..(1u64 << 48)))
    }

    /// Amount string such as `"12.345678 ETH"`
    pub fn transaction_amount(&mut self) -> String {
        format!("{:.6} ETH", self.uniform(0.01, 1000.0))
    }

    pub fn gas_used(&mut self) -> String {
        self.whole(21_000.0, 100_000.0).to_string()
    }

    pub fn gas_price(&mut self) -> String {
        format!("{:.2}", self.uniform(10.0, 50.0))
    }

    pub fn transaction_type(&mut self) -> TransactionType {
        match self.rng.gen_range(0..3) {
            0 => TransactionType::Incoming,
            1 => TransactionType::Outgoing,
            _ => TransactionType::Internal,
        }
    }

    pub fn transaction_status(&mut self) -> TransactionStatus {
        if self.chance(CONFIRMED_RATE) {
            TransactionStatus::Confirmed
        } else {
            TransactionStatus::Pending
        }
    }

    /// Uniform instant within the last [`TIMESTAMP_WINDOW_DAYS`] before `now`
    pub fn timestamp_before(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window_ms = Duration::days(TIMESTAMP_WINDOW_DAYS).num_milliseconds();
        now - Duration::milliseconds(self.rng.gen_range(0..window_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{label, num};

    #[test]
    fn test_fraudulent_ranges() {
        let mut generator = SampleGenerator::seeded(7);
        for _ in 0..200 {
            let tx = generator.generate_sample_transaction(true);
            let tnxs = num(tx.total_erc20_tnxs);
            assert!((150.0..450.0).contains(&tnxs));
            assert_eq!(tnxs, tnxs.floor());
            assert!((25.0..65.0).contains(&num(tx.erc20_uniq_rec_addr)));
            assert!(["Unknown", "Suspicious"].contains(&label(&tx.erc20_most_sent_token_type)));
            assert!(["None", "Unknown"].contains(&label(&tx.erc20_most_rec_token_type)));
            assert!(tx.total_ether_received.is_none());
        }
    }

    #[test]
    fn test_legitimate_ranges() {
        let mut generator = SampleGenerator::seeded(11);
        for _ in 0..200 {
            let tx = generator.generate_sample_transaction(false);
            assert!((5.0..55.0).contains(&num(tx.total_erc20_tnxs)));
            assert!((2.0..17.0).contains(&num(tx.erc20_uniq_rec_addr)));
            assert!((10_000.0..60_000.0).contains(&num(tx.time_diff_between_first_and_last)));
            assert!(MAINSTREAM_TOKENS.contains(&label(&tx.erc20_most_sent_token_type)));
            assert!(MAINSTREAM_TOKENS.contains(&label(&tx.erc20_most_rec_token_type)));
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let a = SampleGenerator::seeded(42).generate_sample_transaction(true);
        let b = SampleGenerator::seeded(42).generate_sample_transaction(true);
        assert_eq!(a, b);
    }

    #[test]
    fn test_metadata_shapes() {
        let mut generator = SampleGenerator::seeded(3);

        let address = generator.random_address();
        assert_eq!(address.len(), 42);
        assert!(address[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let id = generator.transaction_id(7);
        assert_eq!(id.len(), 14);
        assert!(id.ends_with("0007"));
        assert_eq!(generator.single_transaction_id().len(), 14);

        let amount = generator.transaction_amount();
        let (value, unit) = amount.split_once(' ').unwrap();
        assert_eq!(unit, "ETH");
        assert_eq!(value.split_once('.').unwrap().1.len(), 6);

        let gas_used: u64 = generator.gas_used().parse().unwrap();
        assert!((21_000..121_000).contains(&gas_used));
        let gas_price: f64 = generator.gas_price().parse().unwrap();
        assert!((10.0..=60.0).contains(&gas_price));
    }

    #[test]
    fn test_timestamps_within_window() {
        let mut generator = SampleGenerator::seeded(5);
        let now = Utc::now();
        for _ in 0..100 {
            let ts = generator.timestamp_before(now);
            assert!(ts <= now);
            assert!(now - ts <= Duration::days(TIMESTAMP_WINDOW_DAYS));
        }
    }
}
