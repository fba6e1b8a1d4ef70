use crackx::{RunSummary, SegmentLife};
use std::fmt::Write;

/// Render a textual summary of a generation run.
#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut output = String::new();
    let total = summary.completed.len() + summary.stage_limited.len() + summary.failed.len();

    writeln!(
        &mut output,
        "Crack growth run: {total} samples, {} increments",
        summary.increments
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  reached boundary: {}",
        summary.completed.len()
    )
    .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "  load change limit: {}",
        summary.stage_limited.len()
    )
    .expect("writing to string cannot fail");

    // Abandoned samples are listed by id so they can be matched against the ledger.
    if summary.failed.is_empty() {
        output.push_str("  abandoned: none\n");
    } else {
        let ids: Vec<String> = summary
            .failed
            .iter()
            .map(|id| format!("sample{id}"))
            .collect();
        writeln!(
            &mut output,
            "  abandoned: {} ({})",
            summary.failed.len(),
            ids.join(", ")
        )
        .expect("writing to string cannot fail");
    }

    output
}

/// Render per-segment cycles as `segment<TAB>cycles` rows, one-based.
#[must_use]
pub fn render_life(segments: &[SegmentLife]) -> String {
    let mut output = String::new();
    for (index, segment) in segments.iter().enumerate() {
        writeln!(&mut output, "{}\t{}", index + 1, segment.cycles)
            .expect("writing to string cannot fail");
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_human_readable_report() {
        let summary = RunSummary {
            completed: vec![1, 3],
            stage_limited: vec![],
            failed: vec![2],
            increments: 61,
        };
        let report = render_summary(&summary);
        assert!(report.contains("3 samples, 61 increments"));
        assert!(report.contains("reached boundary: 2"));
        assert!(report.contains("abandoned: 1 (sample2)"));
    }

    #[test]
    fn life_rows_are_one_based() {
        let segment = SegmentLife {
            increment: 0.19,
            crack_length: 0.095,
            k_eff: 10.0,
            cycles: 19_587_628,
        };
        assert_eq!(render_life(&[segment, segment]), "1\t19587628\n2\t19587628\n");
    }
}
