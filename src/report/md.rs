use crate::types::report::ScoreReport;

pub fn to_markdown(report: &ScoreReport) -> String {
    let mut output = String::new();
    output.push_str("# Score Report\n\n");
    if let Some(quiz_id) = &report.quiz_id {
        output.push_str(&format!("Quiz: {quiz_id}\n"));
    }
    output.push_str(&format!("Formula: {}\n", report.formula_id));
    output.push_str(&format!("Answers: {}\n\n", report.answer_count));

    output.push_str("## Buckets\n\n");
    output.push_str("| Rank | Bucket | Score | Top |\n");
    output.push_str("|------|--------|-------|-----|\n");
    for result in &report.results {
        // Highlight-only display hides everything outside the top set.
        let score = if report.blur_non_top && !result.is_top_k {
            "hidden".to_string()
        } else {
            format!("{:.1}", result.normalized_score)
        };
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            result.rank,
            result.bucket_name,
            score,
            if result.is_top_k { "yes" } else { "" }
        ));
    }
    output.push('\n');

    if !report.warnings.is_empty() {
        output.push_str("## Warnings\n\n");
        for warning in &report.warnings {
            output.push_str(&format!("- {warning}\n"));
        }
        output.push('\n');
    }

    output
}
