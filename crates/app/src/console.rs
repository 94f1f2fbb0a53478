use std::fmt;
use std::io::{self, BufRead, Write};

use quiz_core::model::{Question, ScoreSummary};
use services::{QuestionView, QuizSession, SessionError};

#[derive(Debug)]
pub enum ConsoleError {
    Io(io::Error),
    Json(serde_json::Error),
    Session(SessionError),
    InputClosed,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Io(err) => write!(f, "console i/o failed: {err}"),
            ConsoleError::Json(err) => write!(f, "failed to render question: {err}"),
            ConsoleError::Session(err) => write!(f, "{err}"),
            ConsoleError::InputClosed => write!(f, "input closed before the quiz finished"),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<io::Error> for ConsoleError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<SessionError> for ConsoleError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

/// Map a typed option number (1-based) to the option text. Anything else is no selection.
fn chosen_option<'q>(question: &'q Question, line: &str) -> &'q str {
    line.trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| question.options().get(idx))
        .map_or("", String::as_str)
}

fn print_question<W: Write>(
    out: &mut W,
    session: &QuizSession,
    question: &Question,
) -> io::Result<()> {
    let progress = session.progress();
    let position = progress.position().unwrap_or(progress.total);
    writeln!(out)?;
    writeln!(out, "Question {position} of {}", progress.total)?;
    writeln!(out, "{}", question.text())?;
    for (idx, option) in question.options().iter().enumerate() {
        writeln!(out, "  {}. {option}", idx + 1)?;
    }
    writeln!(out, "Current Score: {}/{}", progress.score, progress.total)?;
    write!(out, "Your answer (1-{}): ", question.options().len())?;
    out.flush()
}

/// Drive a session to completion over line-based input.
///
/// # Errors
///
/// Returns `ConsoleError::InputClosed` if input ends early and
/// `ConsoleError::Io` when reading or writing fails.
pub fn run_quiz<R: BufRead, W: Write>(
    session: &mut QuizSession,
    input: &mut R,
    out: &mut W,
) -> Result<ScoreSummary, ConsoleError> {
    writeln!(out, "{} Quiz", session.category())?;

    while !session.is_complete() {
        let question = session.current()?.clone();
        print_question(out, session, &question)?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(ConsoleError::InputClosed);
        }

        match session.submit_answer(chosen_option(&question, &line)) {
            Ok(outcome) if outcome.is_correct => writeln!(out, "Correct!")?,
            Ok(outcome) => writeln!(
                out,
                "Wrong answer. The correct answer is: {}",
                outcome.correct_answer
            )?,
            Err(SessionError::NoSelection) => writeln!(out, "Please select an answer")?,
            Err(err) => return Err(err.into()),
        }
    }

    let summary = session.summary()?;
    print_summary(out, &summary)?;
    Ok(summary)
}

pub fn print_summary<W: Write>(out: &mut W, summary: &ScoreSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Quiz Completed!")?;
    writeln!(out, "Your final score: {}/{}", summary.score(), summary.total())?;
    writeln!(out, "Percentage: {:.1}%", summary.percentage())?;
    writeln!(out, "{}", summary.band().feedback())
}

pub fn print_question_list<W: Write>(out: &mut W, questions: &[Question]) -> io::Result<()> {
    if questions.is_empty() {
        return writeln!(out, "No questions found.");
    }
    for question in questions {
        writeln!(out, "{}", QuestionView::from(question).summary_line())?;
    }
    Ok(())
}

/// # Errors
///
/// Returns `ConsoleError::Json` if serialization fails.
pub fn print_question_json<W: Write>(out: &mut W, question: &Question) -> Result<(), ConsoleError> {
    let json = serde_json::to_string_pretty(&QuestionView::from(question))?;
    writeln!(out, "{json}")?;
    Ok(())
}
