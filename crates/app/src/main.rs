mod args;
mod config;
mod console;

use std::io::{self, Write};

use quiz_core::model::QuestionError;
use services::{Clock, QuestionStore, QuestionStoreError, QuizServices, SessionError};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use args::{AdminAction, Args, Command, print_usage};
use config::{AppConfig, normalize_sqlite_url, prepare_sqlite_file};
use console::ConsoleError;

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // Quiz prompts own stdout.
    let stderr_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}

type BoxError = Box<dyn std::error::Error>;

async fn list_categories<W: Write>(store: &QuestionStore, out: &mut W) -> Result<(), BoxError> {
    for category in store.categories() {
        let count = store.count(category).await?;
        writeln!(out, "{category:<12} {count} questions")?;
    }
    Ok(())
}

/// Admin commands run only with the configured password; everything else is open.
fn admin_allowed(command: &Command, config: &AppConfig) -> bool {
    match command {
        Command::Admin { password, .. } => *password == config.admin_password,
        _ => true,
    }
}

/// Failures caused by what the user asked for, as opposed to storage or I/O trouble.
fn is_domain_error(err: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(err) = err.downcast_ref::<QuestionStoreError>() {
        return !matches!(err, QuestionStoreError::Storage(_));
    }
    if let Some(err) = err.downcast_ref::<SessionError>() {
        return !matches!(err, SessionError::Store(QuestionStoreError::Storage(_)));
    }
    if let Some(ConsoleError::Session(err)) = err.downcast_ref::<ConsoleError>() {
        return is_domain_error(err);
    }
    err.is::<QuestionError>()
}

async fn run_admin<W: Write>(
    store: &QuestionStore,
    action: AdminAction,
    out: &mut W,
) -> Result<(), BoxError> {
    match action {
        AdminAction::List { category } => {
            let category = store.resolve(&category)?;
            let questions = store.list(category).await?;
            console::print_question_list(out, &questions)?;
        }
        AdminAction::Show { category, id } => {
            let category = store.resolve(&category)?;
            let question = store.get(category, id).await?;
            console::print_question_json(out, &question)?;
        }
        AdminAction::Add { category, fields } => {
            let category = store.resolve(&category)?;
            let id = store.create(category, fields.into_draft()?).await?;
            writeln!(out, "Question added with id {id}")?;
        }
        AdminAction::Edit {
            category,
            id,
            fields,
        } => {
            let category = store.resolve(&category)?;
            store.update(category, id, fields.into_draft()?).await?;
            writeln!(out, "Question {id} updated")?;
        }
        AdminAction::Delete { category, id } => {
            let category = store.resolve(&category)?;
            store.delete(category, id).await?;
            writeln!(out, "Question {id} deleted")?;
        }
    }
    Ok(())
}

async fn dispatch(command: Command, services: &QuizServices) -> Result<(), BoxError> {
    let mut out = io::stdout().lock();
    match command {
        Command::Help => {}
        Command::Categories | Command::Seed => list_categories(services.store(), &mut out).await?,
        Command::Quiz { category } => {
            let mut session = services.start_quiz(&category).await?;
            let mut input = io::stdin().lock();
            console::run_quiz(&mut session, &mut input, &mut out)?;
        }
        Command::Admin { action, .. } => run_admin(services.store(), action, &mut out).await?,
    }
    Ok(())
}

async fn run() -> Result<(), BoxError> {
    let config = AppConfig::from_env();
    init_tracing(&config.log_filter);

    let parsed = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    if !admin_allowed(&parsed.command, &config) {
        tracing::warn!("admin access denied");
        println!("Incorrect password");
        return Ok(());
    }

    let db_url = parsed
        .db_url
        .map_or(config.db_url, normalize_sqlite_url);
    let demo_data = parsed.demo || config.demo_data || parsed.command == Command::Seed;

    prepare_sqlite_file(&db_url)?;
    let services = QuizServices::new_sqlite(&db_url, Clock::default_clock(), demo_data).await?;
    if parsed.command == Command::Seed {
        tracing::info!(%db_url, "demo data ensured");
    }

    match dispatch(parsed.command, &services).await {
        Err(err) if is_domain_error(err.as_ref()) => {
            tracing::debug!(%err, "command rejected");
            println!("{err}");
            Ok(())
        }
        other => other,
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use args::QuestionFields;
    use quiz_core::model::{Category, QuestionId};
    use quiz_core::time::fixed_clock;
    use storage::repository::{Storage, StorageError};

    async fn services() -> QuizServices {
        QuizServices::from_storage(&Storage::in_memory(), fixed_clock(), false)
            .await
            .unwrap()
    }

    fn admin(password: &str) -> Command {
        Command::Admin {
            password: password.to_owned(),
            action: AdminAction::List {
                category: "History".to_owned(),
            },
        }
    }

    fn fields(text: &str, correct: usize) -> QuestionFields {
        QuestionFields {
            text: text.to_owned(),
            options: ["Paris", "Rome", "Madrid", "Berlin"].map(str::to_owned),
            correct,
        }
    }

    async fn admin_output(services: &QuizServices, action: AdminAction) -> String {
        let mut out = Vec::new();
        run_admin(services.store(), action, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn every_category_is_addressable_by_name() {
        for category in Category::ALL {
            let args = Args::parse(["quiz".to_owned(), category.name().to_owned()]).unwrap();
            assert_eq!(
                args.command,
                Command::Quiz {
                    category: category.name().to_owned()
                }
            );
        }
    }

    #[test]
    fn admin_gate_checks_configured_password() {
        let config = AppConfig::from_lookup(|key| {
            (key == "QUIZ_ADMIN_PASSWORD").then(|| "s3cret".to_owned())
        });

        assert!(admin_allowed(&admin("s3cret"), &config));
        assert!(!admin_allowed(&admin("admin123"), &config));
        assert!(!admin_allowed(&admin(""), &config));
        assert!(admin_allowed(&Command::Categories, &config));
        assert!(admin_allowed(
            &Command::Quiz {
                category: "History".to_owned()
            },
            &config
        ));
    }

    #[test]
    fn admin_gate_defaults_to_builtin_password() {
        let config = AppConfig::from_lookup(|_| None);
        assert!(admin_allowed(&admin("admin123"), &config));
        assert!(!admin_allowed(&admin("Admin123"), &config));
    }

    #[tokio::test]
    async fn admin_add_show_and_delete() {
        let services = services().await;

        let out = admin_output(
            &services,
            AdminAction::Add {
                category: "history".to_owned(),
                fields: fields("Capital of France?", 1),
            },
        )
        .await;
        assert_eq!(out, "Question added with id 1\n");

        let out = admin_output(
            &services,
            AdminAction::Show {
                category: "History".to_owned(),
                id: QuestionId::new(1),
            },
        )
        .await;
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["text"], "Capital of France?");
        assert_eq!(value["correct_answer"], "Paris");

        let out = admin_output(
            &services,
            AdminAction::Delete {
                category: "History".to_owned(),
                id: QuestionId::new(1),
            },
        )
        .await;
        assert_eq!(out, "Question 1 deleted\n");
        assert_eq!(services.store().count(Category::History).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn admin_edit_and_list() {
        let services = services().await;
        admin_output(
            &services,
            AdminAction::Add {
                category: "BMGT".to_owned(),
                fields: fields("Old?", 1),
            },
        )
        .await;

        let out = admin_output(
            &services,
            AdminAction::Edit {
                category: "BMGT".to_owned(),
                id: QuestionId::new(1),
                fields: fields("New?", 4),
            },
        )
        .await;
        assert_eq!(out, "Question 1 updated\n");

        let out = admin_output(
            &services,
            AdminAction::List {
                category: "BMGT".to_owned(),
            },
        )
        .await;
        assert_eq!(out, "[1] New? (answer: Berlin)\n");
    }

    #[tokio::test]
    async fn admin_errors_are_domain_errors() {
        let services = services().await;
        let mut out = Vec::new();

        let err = run_admin(
            services.store(),
            AdminAction::Show {
                category: "History".to_owned(),
                id: QuestionId::new(9),
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(is_domain_error(err.as_ref()));

        let err = run_admin(
            services.store(),
            AdminAction::List {
                category: "Chemistry".to_owned(),
            },
            &mut out,
        )
        .await
        .unwrap_err();
        assert!(is_domain_error(err.as_ref()));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn empty_category_quiz_is_a_domain_error() {
        let services = services().await;
        let err: BoxError = services.start_quiz("History").await.unwrap_err().into();
        assert!(is_domain_error(err.as_ref()));
    }

    #[test]
    fn storage_and_io_failures_are_not_domain_errors() {
        let err: BoxError =
            QuestionStoreError::Storage(StorageError::Connection("gone".into())).into();
        assert!(!is_domain_error(err.as_ref()));

        let err: BoxError = io::Error::other("broken pipe").into();
        assert!(!is_domain_error(err.as_ref()));

        let err: BoxError = ConsoleError::Session(SessionError::EmptyCategory(Category::Bmgt)).into();
        assert!(is_domain_error(err.as_ref()));
    }
}
