// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password strength policy.
//!
//! ## Rules (in precedence order)
//!
//! 1. At least [`MIN_PASSWORD_LENGTH`] characters
//! 2. An uppercase letter
//! 3. A lowercase letter
//! 4. A number
//! 5. A special character (Unicode punctuation or symbol)
//!
//! Characters are classified by Unicode general category. Control, format,
//! mark and whitespace characters satisfy no rule.
//!
//! A password breaking several rules reports only the first one.

use thiserror::Error;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// The single rule a rejected password violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("password must be at least {} characters long", MIN_PASSWORD_LENGTH)]
    TooShort,

    #[error("password must contain at least one uppercase letter")]
    NoUppercase,

    #[error("password must contain at least one lowercase letter")]
    NoLowercase,

    #[error("password must contain at least one number")]
    NoNumber,

    #[error("password must contain at least one special character")]
    NoSpecial,
}

impl PolicyViolation {
    /// Machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            PolicyViolation::TooShort => "password_too_short",
            PolicyViolation::NoUppercase => "password_no_uppercase",
            PolicyViolation::NoLowercase => "password_no_lowercase",
            PolicyViolation::NoNumber => "password_no_number",
            PolicyViolation::NoSpecial => "password_no_special",
        }
    }
}

/// Character classes found in a password.
#[derive(Debug, Default)]
struct CharClasses {
    upper: bool,
    lower: bool,
    number: bool,
    special: bool,
}

impl CharClasses {
    fn scan(password: &str) -> (usize, Self) {
        let mut classes = Self::default();
        let mut length = 0;

        for c in password.chars() {
            length += 1;
            match get_general_category(c) {
                GeneralCategory::UppercaseLetter => classes.upper = true,
                GeneralCategory::LowercaseLetter => classes.lower = true,
                GeneralCategory::DecimalNumber
                | GeneralCategory::LetterNumber
                | GeneralCategory::OtherNumber => classes.number = true,
                GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::OtherPunctuation
                | GeneralCategory::MathSymbol
                | GeneralCategory::CurrencySymbol
                | GeneralCategory::ModifierSymbol
                | GeneralCategory::OtherSymbol => classes.special = true,
                _ => {}
            }
        }

        (length, classes)
    }
}

/// The fixed password strength policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Validate a password, returning the earliest violated rule.
    pub fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        let (length, classes) = CharClasses::scan(password);

        if length < MIN_PASSWORD_LENGTH {
            return Err(PolicyViolation::TooShort);
        }
        if !classes.upper {
            return Err(PolicyViolation::NoUppercase);
        }
        if !classes.lower {
            return Err(PolicyViolation::NoLowercase);
        }
        if !classes.number {
            return Err(PolicyViolation::NoNumber);
        }
        if !classes.special {
            return Err(PolicyViolation::NoSpecial);
        }

        Ok(())
    }
}
