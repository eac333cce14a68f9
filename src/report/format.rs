//! Formatted terminal output for the one-shot commands.
//!
//! Formatting lives here so the client and session code stay free of
//! presentation concerns, and so output is easy to pin down in tests.

use crate::curve::GradationCurve;
use crate::domain::{Field, FieldGroup, HealthStatus, ModelInfo, ParameterSet, PredictionResult};

/// Format every parameter with its accepted range, grouped as on the form.
pub fn format_parameters(params: &ParameterSet) -> String {
    let mut out = String::new();
    for (group, fields) in [
        (FieldGroup::Mix, &Field::MIX[..]),
        (FieldGroup::Gradation, &Field::GRADATION[..]),
    ] {
        out.push_str(&format!("{}:\n", group.title()));
        for &field in fields {
            let p = field.display_precision();
            out.push_str(&format!(
                "  {:<20} {:>9.p$}   [{}, {}]\n",
                field.label(),
                params.get(field),
                field.min(),
                field.max(),
            ));
        }
    }
    out
}

/// Format the sieve / percent-passing table.
pub fn format_gradation_summary(curve: &GradationCurve) -> String {
    let mut out = String::from("Gradation summary:\n");
    for point in curve.iter() {
        out.push_str(&format!("  {:>8}  {:>6.1}%\n", point.label, point.percent_passing));
    }
    let inverted = curve.non_monotone_pairs();
    if !inverted.is_empty() {
        let pairs: Vec<String> = inverted.iter().map(|(a, b)| format!("{a} < {b}")).collect();
        out.push_str(&format!("  note: percent passing increases at {}\n", pairs.join(", ")));
    }
    out
}

pub fn format_model_info(info: &ModelInfo) -> String {
    let mut out = String::new();
    out.push_str(&format!("Model type: {}\n", info.model_type));
    out.push_str(&format!("R² score:   {}\n", info.r2_score));
    out.push_str(&format!("RMSE:       {}\n", info.rmse));
    if let Some(mae) = info.mae {
        out.push_str(&format!("MAE:        {mae}\n"));
    }
    if let Some(n) = info.feature_count {
        out.push_str(&format!("Features:   {n}\n"));
    }
    if !info.features.is_empty() {
        out.push_str(&format!("            {}\n", info.features.join(", ")));
    }
    out
}

pub fn format_prediction(result: &PredictionResult) -> String {
    format!(
        "Predicted VMA: {:.2}%\nConfidence:    {}\nPredicted on:  {}\n",
        result.predicted_vma, result.confidence, result.timestamp
    )
}

pub fn format_health(health: &HealthStatus) -> String {
    format!(
        "Status:       {}\nModel loaded: {}\nTimestamp:    {}\n",
        health.status,
        if health.model_loaded { "yes" } else { "no" },
        health.timestamp
    )
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;
    use crate::curve::project_curve;
    use crate::store::ParameterStore;

    #[test]
    fn parameters_use_field_precision() {
        let txt = format_parameters(&ParameterSet::defaults());
        assert!(txt.starts_with("Mix Design:\n"));
        assert!(txt.contains("Asphalt Content (%)       5.00   [3, 8]"));
        assert!(txt.contains("Gsb                      2.650   [2, 3]"));
        assert!(txt.contains("Gradation (% Passing):\n"));
        assert_eq!(txt.lines().count(), 15);
    }

    #[test]
    fn gradation_summary_default() {
        let txt = format_gradation_summary(&project_curve(&ParameterSet::defaults()));
        let expected = concat!(
            "Gradation summary:\n",
            "      19mm    95.0%\n",
            "    12.5mm    85.0%\n",
            "     9.5mm    70.0%\n",
            "    4.75mm    50.0%\n",
            "    2.36mm    30.0%\n",
            "    1.18mm    20.0%\n",
            "     0.6mm    15.0%\n",
            "     0.3mm    10.0%\n",
            "    0.15mm     5.0%\n",
            "   0.075mm     3.0%\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn gradation_summary_notes_inversions() {
        let mut store = ParameterStore::new();
        store.set(Field::Pass0_15, "3").unwrap();
        store.set(Field::Pass0_075, "7").unwrap();
        let txt = format_gradation_summary(&project_curve(&store.get()));
        assert!(txt.ends_with("note: percent passing increases at PASS_0_15 < PASS_0_075\n"));
    }

    #[test]
    fn prediction_is_rounded_for_display() {
        let result = PredictionResult {
            predicted_vma: 14.376,
            confidence: "Medium".to_string(),
            timestamp: "2025-03-01 10:20:30".to_string(),
            received_at: Local::now(),
        };
        assert_eq!(
            format_prediction(&result),
            "Predicted VMA: 14.38%\nConfidence:    Medium\nPredicted on:  2025-03-01 10:20:30\n"
        );
    }

    #[test]
    fn model_info_omits_absent_extras() {
        let info = ModelInfo {
            model_type: "ExtraTrees Approach 3".to_string(),
            r2_score: 0.7712,
            rmse: 0.5123,
            mae: None,
            feature_count: None,
            features: Vec::new(),
        };
        let txt = format_model_info(&info);
        assert_eq!(txt.lines().count(), 3);
        assert!(txt.contains("R² score:   0.7712"));
    }
}
