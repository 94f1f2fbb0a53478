use std::fmt;

use quiz_core::model::{OPTION_COUNT, QuestionDraft, QuestionError, QuestionId};

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { name: &'static str },
    MissingCommand,
    UnknownCommand(String),
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidQuestionId { raw: String },
    InvalidCorrectOption { raw: String },
    WrongOptionCount { count: usize },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { name } => write!(f, "missing <{name}>"),
            ArgsError::MissingCommand => write!(f, "missing subcommand"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidQuestionId { raw } => write!(f, "invalid question id: {raw}"),
            ArgsError::InvalidCorrectOption { raw } => {
                write!(f, "invalid --correct value (expected 1-{OPTION_COUNT}): {raw}")
            }
            ArgsError::WrongOptionCount { count } => {
                write!(f, "expected exactly {OPTION_COUNT} --option values, got {count}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

/// Question fields given on the command line for `admin add` / `admin edit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFields {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// 1-based number of the correct option.
    pub correct: usize,
}

impl QuestionFields {
    /// # Errors
    ///
    /// Returns `QuestionError::CorrectOptionOutOfRange` if `correct` names no option.
    pub fn into_draft(self) -> Result<QuestionDraft, QuestionError> {
        let index = self.correct.checked_sub(1).unwrap_or(OPTION_COUNT);
        QuestionDraft::with_correct_option(self.text, self.options, index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    List { category: String },
    Show { category: String, id: QuestionId },
    Add { category: String, fields: QuestionFields },
    Edit { category: String, id: QuestionId, fields: QuestionFields },
    Delete { category: String, id: QuestionId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Categories,
    Quiz { category: String },
    Seed,
    Admin { password: String, action: AdminAction },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: Option<String>,
    pub demo: bool,
    pub command: Command,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [--db <sqlite_url>] [--demo] categories");
    eprintln!("  app [--db <sqlite_url>] [--demo] quiz <category>");
    eprintln!("  app [--db <sqlite_url>] seed");
    eprintln!("  app admin --password <pw> list <category>");
    eprintln!("  app admin --password <pw> show <category> <id>");
    eprintln!("  app admin --password <pw> add <category> --text <t> --option <o> (x4) --correct <1-4>");
    eprintln!("  app admin --password <pw> edit <category> <id> --text <t> --option <o> (x4) --correct <1-4>");
    eprintln!("  app admin --password <pw> delete <category> <id>");
    eprintln!();
    eprintln!("Categories: BMGT, DS3850, DS3860, Accounting, History");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_ADMIN_PASSWORD, QUIZ_SEED_DEMO, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_positional(
    args: &mut impl Iterator<Item = String>,
    name: &'static str,
) -> Result<String, ArgsError> {
    match args.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        Some(flag) => Err(ArgsError::UnknownArg(flag)),
        None => Err(ArgsError::MissingArgument { name }),
    }
}

fn parse_id(raw: String) -> Result<QuestionId, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidQuestionId { raw })
}

fn ensure_exhausted(args: &mut impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match args.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(()),
    }
}

fn parse_fields(args: &mut impl Iterator<Item = String>) -> Result<QuestionFields, ArgsError> {
    let mut text = None;
    let mut options = Vec::with_capacity(OPTION_COUNT);
    let mut correct = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--text" => text = Some(require_value(args, "--text")?.trim().to_owned()),
            "--option" => options.push(require_value(args, "--option")?.trim().to_owned()),
            "--correct" => {
                let raw = require_value(args, "--correct")?;
                let n = raw
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=OPTION_COUNT).contains(n))
                    .ok_or(ArgsError::InvalidCorrectOption { raw })?;
                correct = Some(n);
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }

    let count = options.len();
    let options: [String; OPTION_COUNT] = options
        .try_into()
        .map_err(|_| ArgsError::WrongOptionCount { count })?;

    Ok(QuestionFields {
        text: text.ok_or(ArgsError::MissingValue { flag: "--text" })?,
        options,
        correct: correct.ok_or(ArgsError::MissingValue { flag: "--correct" })?,
    })
}

fn parse_admin(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut password = None;
    let action_name = loop {
        let arg = args.next().ok_or(ArgsError::MissingArgument { name: "action" })?;
        match arg.as_str() {
            "--password" => password = Some(require_value(args, "--password")?),
            _ => break arg,
        }
    };

    let action = match action_name.as_str() {
        "list" => {
            let category = require_positional(args, "category")?;
            ensure_exhausted(args)?;
            AdminAction::List { category }
        }
        "show" => {
            let category = require_positional(args, "category")?;
            let id = parse_id(require_positional(args, "id")?)?;
            ensure_exhausted(args)?;
            AdminAction::Show { category, id }
        }
        "add" => {
            let category = require_positional(args, "category")?;
            let fields = parse_fields(args)?;
            AdminAction::Add { category, fields }
        }
        "edit" => {
            let category = require_positional(args, "category")?;
            let id = parse_id(require_positional(args, "id")?)?;
            let fields = parse_fields(args)?;
            AdminAction::Edit { category, id, fields }
        }
        "delete" => {
            let category = require_positional(args, "category")?;
            let id = parse_id(require_positional(args, "id")?)?;
            ensure_exhausted(args)?;
            AdminAction::Delete { category, id }
        }
        _ => return Err(ArgsError::UnknownCommand(format!("admin {action_name}"))),
    };

    Ok(Command::Admin {
        password: password.ok_or(ArgsError::MissingValue { flag: "--password" })?,
        action,
    })
}

impl Args {
    /// Parse command-line arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns `ArgsError` for unknown commands, missing values, or malformed numbers.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter();
        let mut db_url = None;
        let mut demo = false;

        let command_name = loop {
            let Some(arg) = args.next() else {
                return Err(ArgsError::MissingCommand);
            };
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--demo" => demo = true,
                "--help" | "-h" | "help" => {
                    return Ok(Self {
                        db_url,
                        demo,
                        command: Command::Help,
                    });
                }
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => break arg,
            }
        };

        let command = match command_name.as_str() {
            "categories" => {
                ensure_exhausted(&mut args)?;
                Command::Categories
            }
            "quiz" => {
                let category = require_positional(&mut args, "category")?;
                ensure_exhausted(&mut args)?;
                Command::Quiz { category }
            }
            "seed" => {
                ensure_exhausted(&mut args)?;
                Command::Seed
            }
            "admin" => parse_admin(&mut args)?,
            _ => return Err(ArgsError::UnknownCommand(command_name)),
        };

        Ok(Self {
            db_url,
            demo,
            command,
        })
    }
}
