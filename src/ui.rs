//! Terminal front-end for the quiz flows.
//!
//! Thin rendering and prompting helpers over `console`; the engine modules
//! never print anything themselves.

use std::io;
use std::time::Duration;

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::content::{ExtendedQuestion, IntakeQuestion, QuestionKind, ResultContent};
use crate::report::Submission;

/// Characters for the textual page-progress bar.
const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";
const BAR_WIDTH: usize = 20;

/// Application banner.
pub fn banner(term: &Term) -> io::Result<()> {
    term.write_line("")?;
    term.write_line(&format!("{}", style("마인드스톤").bold().cyan()))?;
    term.write_line("오늘의 마음 상태를 비춰 보는 자가진단")?;
    term.write_line("")
}

/// One-line informational notice.
pub fn notice(term: &Term, message: &str) -> io::Result<()> {
    term.write_line(&format!("{}", style(message).dim()))
}

/// Prompt for one line of input.
pub fn prompt(term: &Term, label: &str) -> io::Result<String> {
    term.write_str(&format!("{} ", style(label).green()))?;
    term.read_line()
}

/// Render one intake question with its numbered options.
pub fn render_intake_question(
    term: &Term,
    question: &IntakeQuestion,
    step: usize,
    total: usize,
) -> io::Result<()> {
    term.write_line("")?;
    term.write_line(&format!(
        "{} {}",
        style(format!("[{}/{}]", step + 1, total)).dim(),
        style(&question.title).bold()
    ))?;
    term.write_line(&format!("  {}", style(&question.subtitle).dim()))?;
    for (i, option) in question.options.iter().enumerate() {
        term.write_line(&format!("  {}. {}", i + 1, option.label))?;
    }
    Ok(())
}

/// Render the archetype result card.
pub fn render_result(term: &Term, content: &ResultContent, tags: &[&str]) -> io::Result<()> {
    term.write_line("")?;
    term.write_line("당신의 마음 상태 분석 결과")?;
    term.write_line(&format!("{}", style(&content.name).bold().cyan()))?;
    term.write_line(&format!("\"{}\"", content.oneliner))?;
    if !tags.is_empty() {
        let tag_line: Vec<String> = tags.iter().map(|t| format!("#{}", t.yellow())).collect();
        term.write_line(&tag_line.join(" "))?;
    }
    term.write_line("")?;
    term.write_line(&content.description)?;
    term.write_line("")?;
    term.write_line(&format!("{}", style("지속되면").bold()))?;
    for symptom in &content.symptoms {
        term.write_line(&format!("  - {symptom}"))?;
    }
    term.write_line(&format!("{}", style("바로 할 수 있는 행동").bold()))?;
    for advice in &content.advice {
        term.write_line(&format!("  - {advice}"))?;
    }
    term.write_line("")
}

/// Render the header of an extended-questionnaire page, with a progress bar.
pub fn render_page_header(term: &Term, index: usize, total: usize) -> io::Result<()> {
    let filled = (index * BAR_WIDTH) / total;
    let bar = format!(
        "{}{}",
        BAR_FILLED.repeat(filled),
        BAR_EMPTY.repeat(BAR_WIDTH - filled)
    );
    term.write_line("")?;
    term.write_line(&format!(
        "{} ({}/{})",
        style("마인드 정밀 검사").bold(),
        index + 1,
        total
    ))?;
    term.write_line(&format!("{}", style(bar).cyan()))
}

/// Render one extended question, marking any saved answer.
pub fn render_extended_question(
    term: &Term,
    question: &ExtendedQuestion,
    saved: Option<&str>,
) -> io::Result<()> {
    term.write_line("")?;
    term.write_line(&format!(
        "{}. {}",
        question.id,
        style(&question.prompt).bold()
    ))?;
    match question.kind {
        QuestionKind::Choice => {
            for (i, option) in question.options.iter().enumerate() {
                if saved == Some(option.as_str()) {
                    term.write_line(&format!(
                        "  {} {}",
                        style(format!("{}.", i + 1)).cyan(),
                        style(option).cyan().bold()
                    ))?;
                } else {
                    term.write_line(&format!("  {}. {}", i + 1, option))?;
                }
            }
        }
        QuestionKind::FreeText => {
            if let Some(saved) = saved.filter(|s| !s.is_empty()) {
                term.write_line(&format!("  {}", style(format!("저장된 답: {saved}")).dim()))?;
            }
        }
    }
    Ok(())
}

/// Spinner shown during the simulated analysis delay.
pub async fn analysis_wait(delay: Duration) {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("50가지 답변을 바탕으로 마음을 분석하는 중...");
    tokio::time::sleep(delay).await;
    spinner.finish_and_clear();
}

/// Summary printed once the questionnaire is handed to the report
/// generator.
pub fn render_submission(term: &Term, submission: &Submission) -> io::Result<()> {
    term.write_line("")?;
    term.write_line(&format!(
        "{}",
        style("검사가 완료되었습니다").bold().green()
    ))?;
    term.write_line(&format!(
        "답변 {}개 중 {}개 작성됨",
        submission.answers.len(),
        submission.answered_count()
    ))?;
    term.write_line("작성하신 답변이 에세이 분석으로 전달되었습니다.")?;
    term.write_line("")
}
