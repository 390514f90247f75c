//! Advocate prompt construction
//!
//! Each provider gets its own persona system prompt; all five share the
//! identical two-line output contract that [`crate::advocate::parsing`]
//! expects. User messages follow a fixed header grammar
//! (`PROBLEM_TYPE:` / `SUMMARY_FORMAT:` / `QUESTION:` / `OPTIONS:`), and
//! reconsideration messages append the advocate's own prior answer plus
//! the reasoning of rival stances.

use crate::advocate::result::AdvocateResult;
use crate::core::problem::ProblemType;
use crate::core::provider::Provider;
use crate::labeling::LabeledQuestion;

/// System prompt for one advocate.
pub fn advocate_system(provider: Provider) -> &'static str {
    match provider {
        Provider::OpenAi => {
            "You are one advocate on a panel of independent models.\n\
             \n\
             Your job: answer the user's question and commit to a clear position. Be concise.\n\
             \n\
             Rules:\n\
             - Provide two sections only, in this exact format.\n\
             - Do not mention other models or a debate.\n\
             - Do not hedge with \"it depends\" unless the question is genuinely underspecified; \
               if so, state the single missing detail that matters most.\n\
             - Do not add any extra headings.\n\
             \n\
             Output format (exact):\n\
             EXPLANATION: <brief explanation, max 120 words>\n\
             SUMMARY: <follow the SUMMARY_FORMAT requested in the user message exactly>"
        }
        Provider::Anthropic => {
            "You are one advocate on a panel of independent models.\n\
             \n\
             Goal: produce a decisive, compact answer with a short justification.\n\
             \n\
             Hard constraints:\n\
             - Follow the output format exactly.\n\
             - Keep EXPLANATION under 120 words.\n\
             - Keep SUMMARY to one sentence under 22 words.\n\
             - No lists, no bullet points, no extra headings.\n\
             - No mention of other models or deliberation.\n\
             \n\
             If the question is underspecified, choose the most reasonable interpretation and \
             note the missing detail in the EXPLANATION in one short clause.\n\
             \n\
             Output format (exact):\n\
             EXPLANATION: <brief explanation, max 120 words>\n\
             SUMMARY: <follow the SUMMARY_FORMAT requested in the user message exactly>"
        }
        Provider::Gemini => {
            "You are one advocate on a panel of independent models.\n\
             \n\
             You must answer decisively and concisely.\n\
             \n\
             Rules:\n\
             - Use the exact output format below.\n\
             - EXPLANATION max 120 words.\n\
             - SUMMARY must be one sentence, max 22 words.\n\
             - Do not offer multiple options; pick the best answer.\n\
             - Do not mention other models or any debate.\n\
             \n\
             Output format (exact):\n\
             EXPLANATION: <brief explanation, max 120 words>\n\
             SUMMARY: <follow the SUMMARY_FORMAT requested in the user message exactly>"
        }
        Provider::DeepSeek => {
            "You are one advocate on a panel of independent models.\n\
             \n\
             Be direct. Commit to a position. Be concise.\n\
             \n\
             Rules:\n\
             - Use the exact output format.\n\
             - EXPLANATION max 120 words.\n\
             - SUMMARY one sentence, max 22 words.\n\
             - No extra text outside the two lines.\n\
             - No mention of other models.\n\
             \n\
             Output format (exact):\n\
             EXPLANATION: <brief explanation, max 120 words>\n\
             SUMMARY: <follow the SUMMARY_FORMAT requested in the user message exactly>"
        }
        Provider::Mistral => {
            "You are one advocate on a panel of independent models.\n\
             \n\
             Answer the question with a short justification and a single-sentence summary.\n\
             \n\
             Rules:\n\
             - Output exactly two lines in the exact format below.\n\
             - EXPLANATION max 120 words.\n\
             - SUMMARY must be one sentence, max 22 words, stating the answer plainly.\n\
             - No additional commentary, no other headings.\n\
             \n\
             Output format (exact):\n\
             EXPLANATION: <brief explanation, max 120 words>\n\
             SUMMARY: <follow the SUMMARY_FORMAT requested in the user message exactly>"
        }
    }
}

/// The `PROBLEM_TYPE:` header token for a problem type.
fn problem_label(problem_type: ProblemType) -> &'static str {
    match problem_type {
        ProblemType::SingleSelect => "SINGLE_SELECT",
        ProblemType::MultiSelect => "MULTI_SELECT",
        ProblemType::General | ProblemType::Comparison => "NARRATIVE",
    }
}

/// The `SUMMARY_FORMAT:` instruction for a problem type.
fn summary_format(problem_type: ProblemType, labeled: Option<&LabeledQuestion>) -> String {
    match problem_type {
        ProblemType::SingleSelect => {
            let labels = labeled
                .map(|l| l.label_run())
                .filter(|run| !run.is_empty())
                .unwrap_or_else(|| "A/B/C/D".to_string());
            format!("Output ONLY the single best option letter ({labels}). No other text.")
        }
        ProblemType::MultiSelect => {
            let sample = labeled
                .map(|l| l.label_sample())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "A, B, D".to_string());
            format!(
                "Output ONLY a comma+space separated list of option letters in sorted order \
                 (e.g. '{sample}'). No other text."
            )
        }
        ProblemType::General | ProblemType::Comparison => {
            "Output exactly one sentence (max 22 words) that directly answers the question."
                .to_string()
        }
    }
}

/// Fixed header lines shared by initial and reconsideration messages.
fn header_lines(
    problem_type: ProblemType,
    question: &str,
    labeled: Option<&LabeledQuestion>,
) -> Vec<String> {
    let mut lines = vec![
        format!("PROBLEM_TYPE: {}", problem_label(problem_type)),
        format!("SUMMARY_FORMAT: {}", summary_format(problem_type, labeled)),
    ];

    match labeled {
        Some(labeled) => {
            lines.push(format!("QUESTION: {}", labeled.stem));
            lines.push(format!("OPTIONS: {}", labeled.rendered_options()));
        }
        None => lines.push(format!("QUESTION: {question}")),
    }

    lines
}

/// User message for the initial fan-out. Closed-form questions must pass
/// their labeled form; open-ended questions pass `None`.
pub fn initial_user_message(
    problem_type: ProblemType,
    question: &str,
    labeled: Option<&LabeledQuestion>,
) -> String {
    header_lines(problem_type, question, labeled).join("\n")
}

/// User message for a reconsideration round: the advocate's own previous
/// answer plus the reasoning of every advocate outside its stance group.
/// Same-group peers are withheld — disagreement, not consensus, drives
/// the re-examination.
pub fn reconsider_user_message(
    problem_type: ProblemType,
    question: &str,
    labeled: Option<&LabeledQuestion>,
    prior: &AdvocateResult,
    rival_reasoning: &str,
) -> String {
    let mut lines = header_lines(problem_type, question, labeled);

    lines.push(String::new());
    lines.push(format!("YOUR_PREVIOUS_SUMMARY: {}", prior.summary));
    lines.push(format!("YOUR_PREVIOUS_EXPLANATION: {}", prior.explanation));
    lines.push(String::new());
    lines.push("OTHER_ADVOCATES_REASONING:".to_string());
    lines.push(if rival_reasoning.is_empty() {
        "(none)".to_string()
    } else {
        rival_reasoning.to_string()
    });
    lines.push(String::new());
    lines.push("Instruction:".to_string());
    lines.push(
        "Considering the other advocates' reasoning, do you still stand by your previous stance?"
            .to_string(),
    );
    lines.push("If you change your stance, say so clearly and explain why.".to_string());
    lines.push("If you keep your stance, explain why you are not persuaded.".to_string());
    lines.push(String::new());
    lines.push("Output format (exact):".to_string());
    lines.push("EXPLANATION: <brief explanation, max 120 words>".to_string());
    lines.push("SUMMARY: <follow the SUMMARY_FORMAT requested above exactly>".to_string());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_question() -> LabeledQuestion {
        LabeledQuestion::from_parts("Pick:", vec!["apples".into(), "oranges".into()]).unwrap()
    }

    #[test]
    fn test_every_persona_carries_the_output_contract() {
        for provider in Provider::ALL {
            let system = advocate_system(provider);
            assert!(system.contains("EXPLANATION: <brief explanation"));
            assert!(system.contains("SUMMARY: <follow the SUMMARY_FORMAT"));
        }
    }

    #[test]
    fn test_narrative_message_has_no_options_line() {
        let msg = initial_user_message(ProblemType::General, "Why is the sky blue?", None);
        assert!(msg.starts_with("PROBLEM_TYPE: NARRATIVE\n"));
        assert!(msg.contains("QUESTION: Why is the sky blue?"));
        assert!(!msg.contains("OPTIONS:"));
    }

    #[test]
    fn test_single_select_message_uses_labeled_form() {
        let labeled = fruit_question();
        let msg = initial_user_message(ProblemType::SingleSelect, "ignored raw text", Some(&labeled));
        assert!(msg.starts_with("PROBLEM_TYPE: SINGLE_SELECT\n"));
        assert!(msg.contains("option letter (A/B)"));
        assert!(msg.contains("QUESTION: Pick:"));
        assert!(msg.contains("OPTIONS: A) apples B) oranges"));
        assert!(!msg.contains("ignored raw text"));
    }

    #[test]
    fn test_multi_select_format_hint_uses_label_sample() {
        let labeled = fruit_question();
        let msg = initial_user_message(ProblemType::MultiSelect, "", Some(&labeled));
        assert!(msg.contains("comma+space separated list"));
        assert!(msg.contains("'A, B'"));
    }

    #[test]
    fn test_reconsider_message_carries_prior_and_rivals() {
        let prior = AdvocateResult::new(Provider::Gemini, "Because of X.", "A");
        let msg = reconsider_user_message(
            ProblemType::General,
            "Why?",
            None,
            &prior,
            "Claude:\nCounterpoint Y.",
        );
        assert!(msg.contains("YOUR_PREVIOUS_SUMMARY: A"));
        assert!(msg.contains("YOUR_PREVIOUS_EXPLANATION: Because of X."));
        assert!(msg.contains("OTHER_ADVOCATES_REASONING:\nClaude:\nCounterpoint Y."));
        assert!(msg.contains("still stand by your previous stance"));
    }

    #[test]
    fn test_reconsider_message_marks_absent_rivals() {
        let prior = AdvocateResult::new(Provider::Gemini, "e", "s");
        let msg = reconsider_user_message(ProblemType::General, "Why?", None, &prior, "");
        assert!(msg.contains("OTHER_ADVOCATES_REASONING:\n(none)"));
    }
}
