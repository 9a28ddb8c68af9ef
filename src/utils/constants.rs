//! Constants Module - Single Source of Truth
//!
//! Application-wide names, environment keys and defaults. Scoring weights and
//! thresholds live next to the rule table in `core::scorer`.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "SithWash";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================
// ENVIRONMENT KEYS
// ============================================

pub const ENV_MODEL_PATH: &str = "SITHWASH_MODEL_PATH";
pub const ENV_STRICT_SCHEMA: &str = "SITHWASH_STRICT_SCHEMA";
pub const ENV_HOST: &str = "SITHWASH_HOST";
/// Set by hosting platforms, takes precedence over `SITHWASH_PORT`
pub const ENV_PORT: &str = "PORT";
pub const ENV_PORT_FALLBACK: &str = "SITHWASH_PORT";
pub const ENV_SAMPLE_COUNT: &str = "SITHWASH_SAMPLE_COUNT";
pub const ENV_FRAUD_RATE: &str = "SITHWASH_FRAUD_RATE";
pub const ENV_CACHE_TTL_SECS: &str = "SITHWASH_CACHE_TTL_SECS";
pub const ENV_CACHE_MAX_ENTRIES: &str = "SITHWASH_CACHE_MAX_ENTRIES";

// ============================================
// DEFAULTS
// ============================================

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Default synthetic batch size (dashboard table)
pub const DEFAULT_SAMPLE_COUNT: usize = 20;

/// Upper bound for one synthetic batch
pub const MAX_SAMPLE_COUNT: usize = 500;

/// Share of synthetic transactions drawn from fraudulent ranges
pub const DEFAULT_FRAUD_RATE: f64 = 0.2;

/// Generated transactions stay retrievable by id for 5 minutes
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Cache capacity; the oldest entries are evicted beyond it
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Interval of the background cache cleanup task
pub const CACHE_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Directory for telemetry exports on shutdown
pub const TELEMETRY_EXPORT_DIR: &str = "./telemetry";

// ============================================
// SCORING OUTPUT SHAPE
// ============================================

/// Number of ranked features returned with a prediction
pub const TOP_FEATURE_COUNT: usize = 5;

/// Categorical token-type codes are reduced modulo this value
pub const TOKEN_HASH_MODULUS: i64 = 1000;

/// Token labels treated as suspicious by the scorer
pub const SUSPICIOUS_TOKEN_TYPES: [&str; 3] = ["Unknown", "None", ""];
