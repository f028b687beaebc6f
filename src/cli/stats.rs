use anyhow::Result;
use std::io::{self, Write};

use crate::config::Config;
use crate::stats::{FeedbackStats, NO_DATA_MESSAGE};
use crate::store::FeedbackFile;
use crate::util::title_case;

const RULE: &str = "============================================================";

/// Print analytics for the feedback file named in the config.
pub fn run(config: &Config) -> Result<()> {
    let feedback = FeedbackFile::load(&config.cli.feedback_file);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_stats(feedback.stats().as_ref(), &mut out)?;
    Ok(())
}

pub fn render_stats<W: Write>(stats: Option<&FeedbackStats>, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nFEEDBACK ANALYTICS")?;
    writeln!(out, "{}", RULE)?;

    let Some(stats) = stats else {
        writeln!(out, "{}", NO_DATA_MESSAGE)?;
        return Ok(());
    };

    writeln!(out, "Total Feedback Received: {}", stats.total_feedback)?;
    // Debug keeps the trailing ".0" on whole numbers
    writeln!(out, "Average Rating: {:?}/5.0", stats.average_rating)?;
    writeln!(out, "\nFunction Performance:")?;
    for (function_type, data) in &stats.function_stats {
        writeln!(
            out,
            "  - {}: {:.1}/5.0 ({} responses)",
            title_case(function_type),
            data.avg_rating,
            data.count
        )?;
    }
    writeln!(out, "{}", RULE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::FunctionStats;
    use std::collections::BTreeMap;

    fn render(stats: Option<&FeedbackStats>) -> String {
        let mut out = Vec::new();
        render_stats(stats, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_no_data() {
        let text = render(None);
        assert!(text.contains("FEEDBACK ANALYTICS"));
        assert!(text.contains(NO_DATA_MESSAGE));
    }

    #[test]
    fn test_render_stats() {
        let mut function_stats = BTreeMap::new();
        function_stats.insert(
            "question_answering".to_string(),
            FunctionStats {
                count: 2,
                avg_rating: 4.5,
            },
        );
        let stats = FeedbackStats {
            total_feedback: 2,
            average_rating: 4.5,
            function_stats,
        };
        let text = render(Some(&stats));
        assert!(text.contains("Total Feedback Received: 2"));
        assert!(text.contains("Average Rating: 4.5/5.0"));
        assert!(text.contains("Question Answering: 4.5/5.0 (2 responses)"));
    }
}
