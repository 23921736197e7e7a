//! Validation utilities for the gym billing system
//!
//! Includes India-specific checks for the fields printed on GST invoices.

use rust_decimal::Decimal;

// ============================================================================
// Billing Validations
// ============================================================================

/// Validate a customer name (non-empty after trimming)
pub fn validate_customer_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Customer name is required");
    }
    Ok(())
}

/// Validate an amount that must be strictly positive
pub fn validate_positive_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be a positive number");
    }
    Ok(())
}

/// Validate an amount that must be zero or more (registration fee)
pub fn validate_non_negative_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount must not be negative");
    }
    Ok(())
}

/// Validate a login PIN: 4 to 8 digits
pub fn validate_pin(pin: &str) -> Result<(), &'static str> {
    if pin.len() < 4 || pin.len() > 8 {
        return Err("PIN must be 4 to 8 digits");
    }
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err("PIN must contain digits only");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Validate an Indian mobile number
/// Accepts: 9876543210, 09876543210, +919876543210
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Plain mobile: 10 digits starting 6-9
    if digits.len() == 10 && matches!(digits.chars().next(), Some('6'..='9')) {
        return Ok(());
    }
    // With leading trunk zero
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }
    // With country code 91
    if digits.len() == 12 && digits.starts_with("91") {
        return Ok(());
    }

    Err("Invalid Indian phone number format")
}

/// Validate a GSTIN (GST registration number)
/// 15 characters: 2-digit state code, 10-character PAN, entity digit,
/// literal 'Z', check character.
pub fn validate_gstin(gstin: &str) -> Result<(), &'static str> {
    let gstin = gstin.trim();
    if gstin.len() != 15 {
        return Err("GSTIN must be 15 characters");
    }

    let chars: Vec<char> = gstin.chars().collect();
    if !chars[0].is_ascii_digit() || !chars[1].is_ascii_digit() {
        return Err("GSTIN must start with a 2-digit state code");
    }
    if !chars
        .iter()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    {
        return Err("GSTIN must be uppercase alphanumeric only");
    }
    if chars[13] != 'Z' {
        return Err("GSTIN 14th character must be 'Z'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn customer_name_rejects_whitespace_only() {
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name("Asha Rao").is_ok());
    }

    #[test]
    fn positive_amount_rejects_zero_and_negative() {
        assert!(validate_positive_amount(Decimal::ZERO).is_err());
        assert!(validate_positive_amount(Decimal::from(-5)).is_err());
        assert!(validate_positive_amount(Decimal::from_str("0.01").unwrap()).is_ok());
    }

    #[test]
    fn registration_fee_may_be_zero() {
        assert!(validate_non_negative_amount(Decimal::ZERO).is_ok());
        assert!(validate_non_negative_amount(Decimal::from(-1)).is_err());
    }

    #[test]
    fn pin_format() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("12345678").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("123456789").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn indian_phone_formats() {
        assert!(validate_indian_phone("9876543210").is_ok());
        assert!(validate_indian_phone("09876543210").is_ok());
        assert!(validate_indian_phone("+91 98765 43210").is_ok());
        assert!(validate_indian_phone("1234567890").is_err());
        assert!(validate_indian_phone("98765").is_err());
    }

    #[test]
    fn gstin_shape() {
        assert!(validate_gstin("29ABCDE1234F1Z5").is_ok());
        assert!(validate_gstin("29ABCDE1234F1X5").is_err());
        assert!(validate_gstin("9ABCDE1234F1Z5").is_err());
        assert!(validate_gstin("x9ABCDE1234F1Z5").is_err());
    }
}
