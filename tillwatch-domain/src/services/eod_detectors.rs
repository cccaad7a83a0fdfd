// End-of-day report detectors: sales variance, cash variance

use crate::entities::{DetectionConfig, EodReport};
use crate::services::Verdict;
use crate::value_objects::Severity;

/// Compares a day's total sales against the mean of the trailing history.
/// Requires `sales_min_history` historical reports.
pub fn detect_sales_variance(
    report: &EodReport,
    history: &[EodReport],
    config: &DetectionConfig,
) -> Verdict {
    if history.len() < config.sales_min_history {
        return Verdict::clear();
    }

    let average = history.iter().map(|r| r.total_sales).sum::<f64>() / history.len() as f64;
    if average.abs() < f64::EPSILON {
        return Verdict::clear();
    }

    let variance_pct = (report.total_sales - average) / average * 100.0;
    if variance_pct.abs() <= config.sales_variance_trigger_pct {
        return Verdict::clear();
    }

    let severity = if variance_pct.abs() > config.sales_variance_high_pct {
        Severity::High
    } else {
        Severity::Medium
    };
    Verdict::flag(
        config.sales_variance_confidence,
        severity,
        format!(
            "Total sales of {:.2} deviate {:.0}% from the {}-day average of {:.2}",
            report.total_sales, variance_pct, config.sales_window_days, average
        ),
    )
}

/// Inspects the report's recorded cash discrepancy; local, no history.
pub fn detect_cash_variance(report: &EodReport, config: &DetectionConfig) -> Verdict {
    let discrepancy = report.cash_discrepancy.abs();
    if discrepancy <= config.cash_variance_trigger {
        return Verdict::clear();
    }

    let severity = if discrepancy > config.cash_variance_high {
        Severity::High
    } else if discrepancy > config.cash_variance_medium {
        Severity::Medium
    } else {
        Severity::Low
    };
    Verdict::flag(
        config.cash_variance_confidence,
        severity,
        format!(
            "Cash discrepancy of {:.2} exceeds the tolerated {:.0}",
            report.cash_discrepancy, config.cash_variance_trigger
        ),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use super::*;

    fn report(id: &str, sales: f64, discrepancy: f64, days_ago: i64) -> EodReport {
        EodReport {
            id: id.to_string(),
            outlet_id: "o1".to_string(),
            report_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            total_sales: sales,
            cash_discrepancy: discrepancy,
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    fn history(days: i64, sales: f64) -> Vec<EodReport> {
        (1..=days)
            .map(|d| report(&format!("r{}", d), sales, 0.0, d))
            .collect()
    }

    #[test]
    fn fewer_than_seven_reports_is_insufficient_data() {
        let verdict = detect_sales_variance(
            &report("today", 10_000.0, 0.0, 0),
            &history(6, 1000.0),
            &DetectionConfig::default(),
        );
        assert!(!verdict.triggered);
    }

    #[test]
    fn sales_variance_tiers() {
        let config = DetectionConfig::default();
        let baseline = history(10, 1000.0);

        let high = detect_sales_variance(&report("t", 2500.0, 0.0, 0), &baseline, &config);
        assert!(high.triggered);
        assert_eq!(high.severity, Severity::High);
        assert_eq!(high.confidence, 85);

        let medium = detect_sales_variance(&report("t", 1800.0, 0.0, 0), &baseline, &config);
        assert!(medium.triggered);
        assert_eq!(medium.severity, Severity::Medium);

        let none = detect_sales_variance(&report("t", 1300.0, 0.0, 0), &baseline, &config);
        assert!(!none.triggered);
    }

    #[test]
    fn sales_drop_also_triggers() {
        let verdict = detect_sales_variance(
            &report("t", 300.0, 0.0, 0),
            &history(10, 1000.0),
            &DetectionConfig::default(),
        );
        assert!(verdict.triggered);
        assert_eq!(verdict.severity, Severity::Medium);
    }

    #[test]
    fn cash_variance_tiers() {
        let config = DetectionConfig::default();

        assert!(!detect_cash_variance(&report("t", 0.0, 80.0, 0), &config).triggered);

        let low = detect_cash_variance(&report("t", 0.0, -150.0, 0), &config);
        assert!(low.triggered);
        assert_eq!(low.severity, Severity::Low);
        assert_eq!(low.confidence, 90);

        let medium = detect_cash_variance(&report("t", 0.0, 300.0, 0), &config);
        assert_eq!(medium.severity, Severity::Medium);

        let high = detect_cash_variance(&report("t", 0.0, -900.0, 0), &config);
        assert_eq!(high.severity, Severity::High);
    }
}
