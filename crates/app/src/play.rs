//! Line-based terminal front end for one quiz session.

use anyhow::Context;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuestionKind, QuizId, SessionStatus};
use services::{AppServices, Notice, Notifier, QuizSession, SessionError};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Prints notices straight to the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        println!("  {} {}", notice.title, notice.message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    /// 1-based option number.
    Pick(usize),
    Submit,
    Next,
    Reset,
    Retry,
    Quit,
    Help,
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if let Ok(number) = line.parse::<usize>() {
        return (number > 0).then_some(Input::Pick(number));
    }
    match line.to_ascii_lowercase().as_str() {
        "s" | "submit" => Some(Input::Submit),
        "n" | "next" => Some(Input::Next),
        "r" | "reset" => Some(Input::Reset),
        "x" | "retry" => Some(Input::Retry),
        "q" | "quit" => Some(Input::Quit),
        "h" | "help" | "?" => Some(Input::Help),
        _ => None,
    }
}

/// Play `quiz_id` until the user quits or stdin closes.
///
/// # Errors
///
/// Returns an error if the quiz cannot be opened or stdin fails.
pub async fn run(app: &AppServices, quiz_id: &QuizId) -> anyhow::Result<()> {
    let mut session = match app.sessions().open(quiz_id).await {
        Ok(session) => session,
        Err(SessionError::QuizUnavailable { .. }) => anyhow::bail!("quiz not found: {quiz_id}"),
        Err(error) => return Err(error).context("failed to open quiz"),
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();
    render(&session);

    loop {
        let deadline = session.next_timer_at();
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            () = sleep_until(deadline) => {
                if session.poll_timers() > 0 {
                    render(&session);
                }
                continue;
            }
        };
        let Some(line) = line else {
            break;
        };

        match parse_input(&line) {
            Some(Input::Pick(number)) => {
                let option = session
                    .current_question()
                    .and_then(|q| q.options().get(number - 1))
                    .cloned();
                match option {
                    Some(option) => session.select_answer(option),
                    None => println!("  no option {number}"),
                }
            }
            Some(Input::Submit) => session.submit(),
            Some(Input::Next) => session.advance(),
            Some(Input::Reset) => session.reset(),
            Some(Input::Retry) => session.retry_incorrect(),
            Some(Input::Quit) => break,
            Some(Input::Help) | None => {
                print_help();
                continue;
            }
        }
        render(&session);
    }

    session.flush().await;
    Ok(())
}

async fn sleep_until(deadline: Option<DateTime<Utc>>) {
    match deadline {
        Some(at) => {
            let wait = (at - Utc::now()).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;
        }
        None => std::future::pending().await,
    }
}

fn print_help() {
    println!("  <number> select option   s submit   n next   r restart   x retry missed   q quit");
}

fn render(session: &QuizSession) {
    if session.status() == SessionStatus::Completed {
        if let Some(summary) = session.completion() {
            println!();
            println!("Quiz complete!");
            println!(
                "  correct: {}  incorrect: {}  (quiz has {} questions)",
                summary.correct, summary.incorrect, summary.total_questions
            );
            if summary.can_retry {
                println!("  x to retry the questions you missed, r to start over");
            } else {
                println!("  r to start over, q to quit");
            }
        }
        return;
    }

    let Some(question) = session.current_question() else {
        return;
    };
    let progress = session.progress();
    println!();
    println!(
        "Question {}/{}  ({:.0}% answered, {} correct, {} incorrect)",
        progress.question_number,
        progress.total,
        progress.percent_complete,
        progress.correct,
        progress.incorrect
    );
    println!("{}", question.prompt());
    if question.kind() == QuestionKind::Multiple {
        println!("  (select all that apply)");
    }
    for (number, option) in (1..).zip(question.options()) {
        let mark = if session.selected_answers().contains(option) {
            "x"
        } else {
            " "
        };
        println!("  [{mark}] {number}. {option}");
    }

    if session.is_submitted() {
        if session.is_shaking() {
            println!("  Incorrect.");
        }
        let next = if session.is_last_question() { "finish" } else { "next question" };
        println!("  n for {next}");
    }
}
