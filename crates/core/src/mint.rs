use primitive_types::U256;
use serde_json::Value;

use crate::CallbackError;

/// Decimal places of the minted token.
pub const MINT_DECIMALS: usize = 18;

/// Mint amount reported on a successful deposit, in whole units.
pub const MINT_UNITS: u64 = 100;

/// Returns the fixed mint amount, `100 * 10^18`.
pub fn default_mint_amount() -> U256 {
    U256::from(MINT_UNITS) * U256::exp10(MINT_DECIMALS)
}

/// Where the mint amount of a deposit comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintAmountSource {
    /// A constant amount, regardless of the upstream response.
    Fixed(U256),
    /// A field of the upstream response body.
    ///
    /// The field may hold an unsigned integer or a decimal string.
    ResponseField(String),
}

impl Default for MintAmountSource {
    fn default() -> Self {
        Self::Fixed(default_mint_amount())
    }
}

impl MintAmountSource {
    /// Name of the response field carrying the amount.
    pub const RESPONSE_FIELD: &str = "mint_amount";

    /// Reads the amount from the `mint_amount` response field.
    pub fn response() -> Self {
        Self::ResponseField(Self::RESPONSE_FIELD.into())
    }

    /// Resolves the amount against the response body.
    ///
    /// Returns `None` if the amount is undefined.
    pub fn resolve(&self, data: &Value) -> Option<U256> {
        match self {
            MintAmountSource::Fixed(v) => Some(*v),
            MintAmountSource::ResponseField(f) => match data.get(f)? {
                Value::Number(n) => n
                    .as_u64()
                    .map(U256::from)
                    .or_else(|| n.as_f64().and_then(u256_from_f64)),
                Value::String(s) => U256::from_dec_str(s.trim()).ok(),
                _ => None,
            },
        }
    }
}

/// Converts an integral, non-negative float to its exact `U256` value.
///
/// JSON integers above `u64::MAX` are parsed as floats.
fn u256_from_f64(v: f64) -> Option<U256> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
        return None;
    }

    if v == 0.0 {
        return Some(U256::zero());
    }

    let bits = v.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64 - 1075;
    let mantissa = (bits & ((1 << 52) - 1)) | (1 << 52);

    if exponent >= 0 {
        // 53 significant bits must fit in 256
        if exponent > 256 - 53 {
            return None;
        }

        Some(U256::from(mantissa) << exponent as usize)
    } else {
        Some(U256::from(mantissa >> (-exponent) as u32))
    }
}

/// Checks that the mint amount is defined and non-zero.
pub fn validate_mint_amount(amount: Option<U256>) -> Result<U256, CallbackError> {
    match amount {
        Some(a) if !a.is_zero() => Ok(a),
        _ => Err(CallbackError::InvalidMintAmount),
    }
}

#[test]
fn default_amount_is_hundred_tokens() {
    assert_eq!(
        default_mint_amount(),
        U256::from_dec_str("100000000000000000000").unwrap()
    );
}

#[test]
fn fixed_source_ignores_body() {
    let source = MintAmountSource::default();

    assert_eq!(
        source.resolve(&serde_json::json!({"mint_amount": "1"})),
        Some(default_mint_amount())
    );
    assert_eq!(source.resolve(&Value::Null), Some(default_mint_amount()));
}

#[test]
fn response_source_reads_field() {
    let source = MintAmountSource::response();

    assert_eq!(
        source.resolve(&serde_json::json!({"mint_amount": 42})),
        Some(U256::from(42u64))
    );
    assert_eq!(
        source.resolve(&serde_json::json!({"mint_amount": "100000000000000000000"})),
        Some(default_mint_amount())
    );
    assert_eq!(source.resolve(&serde_json::json!({"id": 101})), None);
    assert_eq!(source.resolve(&serde_json::json!({"mint_amount": -1})), None);
    assert_eq!(source.resolve(&serde_json::json!({"mint_amount": "abc"})), None);
    assert_eq!(source.resolve(&Value::Null), None);
}

#[test]
fn response_source_reads_large_json_numbers() {
    let data: Value = serde_json::from_str(r#"{"mint_amount": 100000000000000000000}"#).unwrap();

    assert_eq!(
        MintAmountSource::response().resolve(&data),
        Some(default_mint_amount())
    );

    let data: Value = serde_json::from_str(r#"{"mint_amount": 1.5e20}"#).unwrap();

    assert_eq!(
        MintAmountSource::response().resolve(&data),
        Some(U256::from(150_000_000_000_000_000_000u128))
    );
}

#[test]
fn float_conversion_is_exact_or_rejected() {
    assert_eq!(u256_from_f64(0.0), Some(U256::zero()));
    assert_eq!(u256_from_f64(42.0), Some(U256::from(42u64)));
    assert_eq!(u256_from_f64(2f64.powi(200)), Some(U256::one() << 200usize));
    assert_eq!(u256_from_f64(2f64.powi(256)), None);
    assert_eq!(u256_from_f64(1.5), None);
    assert_eq!(u256_from_f64(-1.0), None);
    assert_eq!(u256_from_f64(f64::NAN), None);
    assert_eq!(u256_from_f64(f64::INFINITY), None);
}

#[test]
fn zero_and_undefined_are_invalid() {
    assert_eq!(
        validate_mint_amount(Some(U256::zero())),
        Err(CallbackError::InvalidMintAmount)
    );
    assert_eq!(
        validate_mint_amount(None),
        Err(CallbackError::InvalidMintAmount)
    );
    assert_eq!(validate_mint_amount(Some(U256::one())), Ok(U256::one()));
}
