use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use console::Term;
use thiserror::Error;
use tracing::info;

use mindstone::auth::{AuthError, AuthStore, Session};
use mindstone::config::Settings;
use mindstone::content::{Catalog, ContentError, ExtendedQuestion, QuestionKind};
use mindstone::extended::{AnswerError, ExtendedTest, PageAdvance, PageView};
use mindstone::logging::{init_logging, LoggingConfig};
use mindstone::persistence::{FileProgressStore, PersistError, ProgressStore};
use mindstone::scoring::{classify, Classification, TraitScores};
use mindstone::session::IntakeSession;
use mindstone::ui;

#[derive(Parser, Debug)]
#[command(name = "mindstone")]
#[command(version)]
#[command(about = "마음 자가진단: 6문항 인테이크와 50문항 정밀 검사")]
struct Cli {
    /// Path to a config file (default: ./mindstone.toml when present)
    #[arg(long, short, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive assessment (default)
    Run {
        /// Skip login and keep progress in memory only
        #[arg(long)]
        anonymous: bool,
    },
    /// Classify a comma-separated list of trait scores S,C,T,D,F,E
    Classify {
        /// Six values 0-5, e.g. "5,5,0,0,0,0"
        scores: String,
    },
    /// Log out of the stored session
    Logout,
    /// Clear saved questionnaire progress for an identity
    Reset {
        /// Identity (email) whose progress should be removed
        email: String,
    },
}

#[derive(Error, Debug)]
enum AppError {
    #[error("{0}")]
    Content(#[from] ContentError),
    #[error("{0}")]
    Persist(#[from] PersistError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Answer(#[from] AnswerError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scores: {0}")]
    InvalidScores(String),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(LoggingConfig::from_flags(cli.verbose, cli.quiet));

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command.unwrap_or(Commands::Run { anonymous: false }) {
        Commands::Run { anonymous } => cmd_run(&settings, anonymous).await,
        Commands::Classify { scores } => cmd_classify(&scores),
        Commands::Logout => cmd_logout(&settings),
        Commands::Reset { email } => cmd_reset(&settings, &email),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Parse "S,C,T,D,F,E" and print the classification.
fn cmd_classify(input: &str) -> Result<(), AppError> {
    let values: Vec<u8> = input
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .map_err(|_| AppError::InvalidScores(input.to_string()))?;
    let [s, c, t, d, f, e]: [u8; 6] = values
        .try_into()
        .map_err(|_| AppError::InvalidScores(input.to_string()))?;
    if [s, c, t, d, f, e].iter().any(|&v| v > 5) {
        return Err(AppError::InvalidScores(input.to_string()));
    }

    let scores = TraitScores {
        strain: s,
        control: c,
        trigger: t,
        difficulty: d,
        flux: f,
        expression: e,
    };
    let classification = classify(&scores);

    let catalog = Catalog::builtin()?;
    let content = catalog.result(classification.result);
    println!("type: {}", classification.result.code());
    println!("name: {}", content.name);
    println!("tags: {}", classification.tags.join(", "));
    Ok(())
}

fn cmd_logout(settings: &Settings) -> Result<(), AppError> {
    let auth = AuthStore::new(&settings.data_dir)?;
    auth.logout()?;
    println!("로그아웃 되었습니다.");
    Ok(())
}

fn cmd_reset(settings: &Settings, email: &str) -> Result<(), AppError> {
    let store = FileProgressStore::new(&settings.data_dir)?;
    store.clear(email)?;
    println!("저장된 진행 상황을 삭제했습니다: {email}");
    Ok(())
}

async fn cmd_run(settings: &Settings, anonymous: bool) -> Result<(), AppError> {
    let catalog = Catalog::builtin()?;
    let term = Term::stdout();
    ui::banner(&term)?;

    let session = if anonymous {
        None
    } else {
        sign_in(&term, &AuthStore::new(&settings.data_dir)?)?
    };

    let Some(classification) = run_intake(&term, &catalog)? else {
        return Ok(());
    };
    ui::render_result(
        &term,
        catalog.result(classification.result),
        &classification.tags,
    )?;

    let go = ui::prompt(&term, "더 구체적인 마인드 정밀 검사를 시작할까요? (y/n)")?;
    if !go.trim().eq_ignore_ascii_case("y") {
        return Ok(());
    }

    run_extended(&term, settings, &catalog, session.as_ref()).await
}

/// Login / signup / skip. Skipping means an anonymous session.
fn sign_in(term: &Term, auth: &AuthStore) -> Result<Option<Session>, AppError> {
    if let Some(session) = auth.current()? {
        ui::notice(term, &format!("{}님으로 로그인되어 있습니다.", session.name))?;
        return Ok(Some(session));
    }

    let choice = ui::prompt(term, "로그인(l) / 회원가입(s) / 그냥 시작(enter)")?;
    match choice.trim() {
        "l" => {
            let email = ui::prompt(term, "이메일:")?;
            let password = ui::prompt(term, "비밀번호:")?;
            match auth.login(email.trim(), password.trim()) {
                Ok(session) => {
                    ui::notice(term, &format!("{}님, 환영합니다!", session.name))?;
                    Ok(Some(session))
                }
                Err(AuthError::InvalidCredentials) => {
                    ui::notice(term, "이메일 또는 비밀번호가 일치하지 않습니다.")?;
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        }
        "s" => {
            let name = ui::prompt(term, "이름:")?;
            let email = ui::prompt(term, "이메일:")?;
            let password = ui::prompt(term, "비밀번호:")?;
            match auth.signup(name.trim(), email.trim(), password.trim()) {
                Ok(()) => {
                    let session = auth.login(email.trim(), password.trim())?;
                    ui::notice(term, &format!("가입 완료! {}님, 환영합니다.", session.name))?;
                    Ok(Some(session))
                }
                Err(AuthError::DuplicateEmail(email)) => {
                    ui::notice(term, &format!("이미 가입된 이메일입니다: {email}"))?;
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        }
        _ => Ok(None),
    }
}

/// Drive the six-question intake; `None` means the user quit early.
fn run_intake(term: &Term, catalog: &Catalog) -> Result<Option<Classification>, AppError> {
    let mut intake = IntakeSession::new(catalog.intake().to_vec());

    while let Some(question) = intake.current_question().cloned() {
        let step = intake.progress().current();
        ui::render_intake_question(term, &question, step, intake.progress().total())?;
        let label = if step > 0 {
            "번호를 선택하세요 (b: 뒤로, q: 종료)"
        } else {
            "번호를 선택하세요 (q: 종료)"
        };
        let input = ui::prompt(term, label)?;
        match input.trim() {
            "q" => return Ok(None),
            "b" => {
                intake.back();
            }
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => {
                    if let Err(e) = intake.answer(n - 1) {
                        ui::notice(term, &e.to_string())?;
                    }
                }
                _ => {
                    ui::notice(
                        term,
                        &format!("1-{} 사이의 번호를 입력해 주세요", question.options.len()),
                    )?;
                }
            },
        }
    }

    Ok(intake.classification())
}

/// Drive the paginated extended questionnaire to submission.
async fn run_extended(
    term: &Term,
    settings: &Settings,
    catalog: &Catalog,
    session: Option<&Session>,
) -> Result<(), AppError> {
    let mut test: ExtendedTest<FileProgressStore> =
        ExtendedTest::new(catalog.extended().to_vec(), settings.page_size);
    match session {
        Some(session) => {
            let store = FileProgressStore::new(&settings.data_dir)?;
            test.resume(session.email.clone(), store);
        }
        None => test.start_anonymous(),
    }

    loop {
        let page_questions = match test.current_page() {
            PageView::Questions {
                index,
                total,
                questions,
            } => {
                ui::render_page_header(term, index, total)?;
                questions.to_vec()
            }
            PageView::ReadyToSubmit => break,
        };

        for question in &page_questions {
            ui::render_extended_question(term, question, test.saved_answer(question.id))?;
            collect_answer(term, &mut test, question)?;
        }

        let on_last_page = test.page() + 1 == test.total_pages();
        let label = if on_last_page {
            "분석 요청하기(n) / 이전(p) / 종료(q)"
        } else {
            "다음 단계로 저장(n) / 이전(p) / 종료(q)"
        };
        match ui::prompt(term, label)?.trim() {
            "p" => {
                test.prev_page()?;
            }
            "q" => return Ok(()),
            _ => {
                if test.next_page()? == PageAdvance::Completed {
                    break;
                }
            }
        }
    }

    submit(term, settings, &test).await
}

/// Collect one answer; empty input leaves the question unanswered.
fn collect_answer(
    term: &Term,
    test: &mut ExtendedTest<FileProgressStore>,
    question: &ExtendedQuestion,
) -> Result<(), AppError> {
    match question.kind {
        QuestionKind::Choice => loop {
            let input = ui::prompt(term, "선택 (enter: 건너뛰기)")?;
            let trimmed = input.trim();
            if trimmed.is_empty() {
                return Ok(());
            }
            match trimmed.parse::<usize>() {
                Ok(n) if n >= 1 && n <= question.options.len() => {
                    test.record_choice(question.id, &question.options[n - 1])?;
                    return Ok(());
                }
                _ => ui::notice(
                    term,
                    &format!("1-{} 사이의 번호를 입력해 주세요", question.options.len()),
                )?,
            }
        },
        QuestionKind::FreeText => {
            let input = ui::prompt(term, "답변 (enter: 건너뛰기)")?;
            if !input.trim().is_empty() {
                test.record_text(question.id, input.trim())?;
            }
            Ok(())
        }
    }
}

async fn submit(
    term: &Term,
    settings: &Settings,
    test: &ExtendedTest<FileProgressStore>,
) -> Result<(), AppError> {
    ui::analysis_wait(settings.analysis_delay()).await;

    let submission = test.submission();
    info!(
        answered = submission.answered_count(),
        total = submission.answers.len(),
        "questionnaire submitted"
    );
    ui::render_submission(term, &submission)?;
    test.clear_saved()?;
    Ok(())
}
