/*
 * Copyright (c) 2025 The NAMIB Project Developers.
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 *
 * SPDX-License-Identifier: MIT OR Apache-2.0
 */

//! Deterministic evaluation of CWT claim predicates (RFC 8392 §7).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use derive_builder::Builder;

use crate::cwt::{Claims, ClaimsMap};
use crate::error::{ClaimsError, CoseError};

#[cfg(test)]
mod tests;

const OP: &str = "cwt::validate";

/// Configuration of a [`Validator`].
///
/// Identity predicates are checked only when an expectation is set. The
/// clock skew widens the acceptance window of every time predicate and
/// defaults to zero; `fixed_now` pins the evaluation time for tests.
#[derive(Clone, Debug, Default, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct ValidationOptions {
    /// Required value of the `iss` claim.
    pub expected_issuer: Option<String>,
    /// Required value of the `aud` claim.
    pub expected_audience: Option<String>,
    /// Required value of the `sub` claim.
    pub expected_subject: Option<String>,
    /// Tolerance applied to `exp`, `nbf` and `iat`.
    pub clock_skew: Duration,
    /// Evaluation time in seconds since the epoch; the system clock is
    /// used when unset.
    pub fixed_now: Option<i64>,
    /// Reject tokens whose `iat` lies in the future. Off by default:
    /// an implausible issue time does not make the token unusable.
    pub strict_issued_at: bool,
}

impl ValidationOptions {
    /// Returns a builder for validation options.
    #[must_use]
    pub fn builder() -> ValidationOptionsBuilder {
        ValidationOptionsBuilder::default()
    }
}

/// Evaluates claim sets against a fixed set of expectations.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    options: ValidationOptions,
}

impl Validator {
    /// Creates a validator with the given options.
    #[must_use]
    pub fn new(options: ValidationOptions) -> Validator {
        Validator { options }
    }

    /// Validates a named claim set.
    ///
    /// Predicates run in a fixed order: issuer, audience, subject,
    /// lifetime consistency (`exp > nbf`), expiration, not-before,
    /// issued-at.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::ClaimsInvalid`](crate::error::ErrorKind::ClaimsInvalid)
    /// carrying the first failing predicate's subkind.
    pub fn validate(&self, claims: &Claims) -> Result<(), CoseError> {
        let now = self.options.fixed_now.unwrap_or_else(unix_now);
        let skew = skew_seconds(&self.options.clock_skew);

        if let Some(expected) = &self.options.expected_issuer {
            if claims.issuer.as_ref() != Some(expected) {
                return Err(CoseError::claims(OP, ClaimsError::IssuerMismatch));
            }
        }
        if let Some(expected) = &self.options.expected_audience {
            if claims.audience.as_ref() != Some(expected) {
                return Err(CoseError::claims(OP, ClaimsError::AudienceMismatch));
            }
        }
        if let Some(expected) = &self.options.expected_subject {
            if claims.subject.as_ref() != Some(expected) {
                return Err(CoseError::claims(OP, ClaimsError::SubjectMismatch));
            }
        }

        if let (Some(expiration), Some(not_before)) = (claims.expiration, claims.not_before) {
            if expiration <= not_before {
                return Err(CoseError::claims(OP, ClaimsError::InvalidLifetime));
            }
        }
        if let Some(expiration) = claims.expiration {
            if now.saturating_sub(skew) >= expiration {
                return Err(CoseError::claims(OP, ClaimsError::Expired));
            }
        }
        if let Some(not_before) = claims.not_before {
            if now.saturating_add(skew) < not_before {
                return Err(CoseError::claims(OP, ClaimsError::NotYetValid));
            }
        }
        if let Some(issued_at) = claims.issued_at {
            if self.options.strict_issued_at && issued_at > now.saturating_add(skew) {
                return Err(CoseError::claims(OP, ClaimsError::IssuedInFuture));
            }
        }
        Ok(())
    }

    /// Validates the map form of a claim set.
    ///
    /// The registered claims (1..=7) are extracted with shape checks;
    /// extension claims are ignored.
    ///
    /// # Errors
    ///
    /// Fails on a wrongly-shaped registered claim or a failing predicate.
    pub fn validate_map(&self, claims: &ClaimsMap) -> Result<(), CoseError> {
        self.validate(&Claims::from_map(claims)?)
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn skew_seconds(skew: &Duration) -> i64 {
    i64::try_from(skew.as_secs()).unwrap_or(i64::MAX)
}
