// Invoice detectors: price spike, missing information, duplicate invoice

use crate::entities::{DetectionConfig, Invoice};
use crate::services::Verdict;
use crate::value_objects::Severity;

/// One-directional price-spike check against the vendor's invoice history.
/// Only the `invoice_history_cap` most recent comparables are considered;
/// fewer than `min_comparables` is a defined non-finding.
pub fn detect_price_spike(
    invoice: &Invoice,
    comparables: &[Invoice],
    config: &DetectionConfig,
) -> Verdict {
    let Some(total) = invoice.total_amount else {
        return Verdict::clear();
    };

    let mut history: Vec<&Invoice> = comparables
        .iter()
        .filter(|i| i.total_amount.is_some())
        .collect();
    history.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
    history.truncate(config.invoice_history_cap);

    if history.len() < config.min_comparables {
        return Verdict::clear();
    }

    let average = history
        .iter()
        .filter_map(|i| i.total_amount)
        .sum::<f64>()
        / history.len() as f64;
    if average.abs() < f64::EPSILON {
        return Verdict::clear();
    }

    let variance_pct = (total - average) / average * 100.0;
    if variance_pct <= config.price_spike_trigger_pct {
        return Verdict::clear();
    }

    let severity = if variance_pct > config.price_spike_high_pct {
        Severity::High
    } else if variance_pct > config.price_spike_medium_pct {
        Severity::Medium
    } else {
        Severity::Low
    };
    let confidence = (variance_pct.abs() * 2.0)
        .min(config.price_spike_max_confidence as f64)
        .round() as u8;

    Verdict::flag(
        confidence,
        severity,
        format!(
            "Invoice total {:.2} is {:.0}% above the vendor average of {:.2} over {} invoices",
            total,
            variance_pct,
            average,
            history.len()
        ),
    )
}

/// Required-field check; deterministic, no historical lookup.
pub fn detect_missing_info(invoice: &Invoice, config: &DetectionConfig) -> Verdict {
    let mut missing = Vec::new();
    if invoice
        .vendor_id
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        missing.push("vendor reference");
    }
    if invoice
        .invoice_number
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        missing.push("invoice number");
    }
    if invoice.due_date.is_none() {
        missing.push("due date");
    }
    if invoice.total_amount.is_none() {
        missing.push("total amount");
    }

    if missing.is_empty() {
        return Verdict::clear();
    }

    let severity = if missing.len() >= config.missing_info_medium_at {
        Severity::Medium
    } else {
        Severity::Low
    };
    Verdict::flag(
        config.missing_info_confidence,
        severity,
        format!("Invoice is missing required fields: {}", missing.join(", ")),
    )
}

/// Duplicate-invoice check against the vendor's invoices from the preceding
/// window (candidate excluded).
pub fn detect_duplicate_invoice(
    invoice: &Invoice,
    comparables: &[Invoice],
    config: &DetectionConfig,
) -> Verdict {
    if let Some(number) = invoice
        .invoice_number
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        for other in comparables {
            if let Some(other_number) = other.invoice_number.as_deref() {
                if number.eq_ignore_ascii_case(other_number) {
                    return Verdict::flag(
                        95,
                        Severity::High,
                        format!(
                            "Invoice number '{}' already used by invoice {} for the same vendor",
                            number, other.id
                        ),
                    );
                }
            }
        }
    }

    if let Some(total) = invoice.total_amount {
        for other in comparables {
            if let Some(other_total) = other.total_amount {
                if (total - other_total).abs() < config.duplicate_exact_tolerance {
                    return Verdict::flag(
                        80,
                        Severity::Medium,
                        format!(
                            "Invoice total {:.2} matches invoice {} for the same vendor",
                            total, other.id
                        ),
                    );
                }
            }
        }
    }

    Verdict::clear()
}
