// Payment detectors: duplicate payment, unauthorized account, amount variance

use crate::entities::{DetectionConfig, Payment, Vendor};
use crate::services::Verdict;
use crate::value_objects::Severity;

/// Duplicate-payment check against the vendor's payments from the preceding
/// window (candidate excluded). The first matching comparable is cited;
/// which record is "the original" is not guaranteed.
pub fn detect_duplicate_payment(
    payment: &Payment,
    comparables: &[Payment],
    config: &DetectionConfig,
) -> Verdict {
    for other in comparables {
        let amount_delta = (payment.amount - other.amount).abs();
        let hours_apart = (payment.paid_at - other.paid_at).num_hours().abs();

        if amount_delta < config.duplicate_exact_tolerance
            && hours_apart <= config.duplicate_exact_window_hours
        {
            let confidence = config.duplicate_exact_confidence;
            let severity = if confidence > 80 {
                Severity::High
            } else {
                Severity::Medium
            };
            return Verdict::flag(
                confidence,
                severity,
                format!(
                    "Payment of {:.2} matches payment {} ({:.2}) made {}h earlier to the same vendor",
                    payment.amount, other.id, other.amount, hours_apart
                ),
            );
        }
    }

    for other in comparables {
        if other.amount.abs() < f64::EPSILON {
            continue;
        }
        let relative_pct = ((payment.amount - other.amount) / other.amount).abs() * 100.0;
        if relative_pct <= config.duplicate_near_pct {
            return Verdict::flag(
                config.duplicate_near_confidence,
                Severity::Medium,
                format!(
                    "Payment of {:.2} is within {:.1}% of payment {} ({:.2}) to the same vendor",
                    payment.amount, relative_pct, other.id, other.amount
                ),
            );
        }
    }

    Verdict::clear()
}

/// Checks the payment's account reference against the vendor's registered
/// settlement account. Partial-string containment is deliberately loose to
/// tolerate masked account numbers; false positives resolve manually.
pub fn detect_unauthorized_account(payment: &Payment, vendor: &Vendor) -> Verdict {
    let Some(account_ref) = payment.account_ref.as_deref().filter(|s| !s.trim().is_empty())
    else {
        return Verdict::clear();
    };

    match vendor
        .settlement_account
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        None => Verdict::flag(
            60,
            Severity::Medium,
            format!(
                "Payment references account '{}' but vendor {} has no registered settlement account",
                account_ref, vendor.name
            ),
        ),
        Some(registered) => {
            let tail: String = registered
                .chars()
                .rev()
                .take(4)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            if account_ref.contains(&tail) {
                Verdict::clear()
            } else {
                Verdict::flag(
                    80,
                    Severity::High,
                    format!(
                        "Payment account '{}' does not match vendor {}'s registered account ending in {}",
                        account_ref, vendor.name, tail
                    ),
                )
            }
        }
    }
}

/// Amount-variance check against the vendor's trailing payment history.
/// Fewer comparables than `min_comparables` is a defined non-finding.
pub fn detect_amount_variance(
    payment: &Payment,
    comparables: &[Payment],
    config: &DetectionConfig,
) -> Verdict {
    if comparables.len() < config.min_comparables {
        return Verdict::clear();
    }

    let average =
        comparables.iter().map(|p| p.amount).sum::<f64>() / comparables.len() as f64;
    if average.abs() < f64::EPSILON {
        return Verdict::clear();
    }
    let variance = (payment.amount - average) / average;

    if variance.abs() > config.payment_variance_high {
        Verdict::flag(
            90,
            Severity::High,
            format!(
                "Payment of {:.2} deviates {:.0}% from the vendor average of {:.2}",
                payment.amount,
                variance * 100.0,
                average
            ),
        )
    } else if variance.abs() > config.payment_variance_medium {
        Verdict::flag(
            75,
            Severity::Medium,
            format!(
                "Payment of {:.2} deviates {:.0}% from the vendor average of {:.2}",
                payment.amount,
                variance * 100.0,
                average
            ),
        )
    } else {
        Verdict::clear()
    }
}
