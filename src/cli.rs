// src/cli.rs
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};

use crate::core::config::{self, CasebookConfig, DEFAULT_CONFIG_FILE};
use crate::infra::{fs::ensure_parent_dir, store::Store, t};

pub mod commands;

/// Everything a command needs: the opened store, the loaded configuration
/// and the resolved locale.
pub struct Session {
    pub store: Store,
    pub config: CasebookConfig,
    pub locale: String,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let pos = args.iter().position(|arg| arg == "--lang")?;
    args.get(pos + 1).cloned()
}

fn id_arg(name: &'static str, help: String) -> Arg {
    Arg::new(name)
        .help(help)
        .required(true)
        .value_parser(clap::value_parser!(i64))
        .action(ArgAction::Set)
}

fn text_arg(name: &'static str, help: String) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .action(ArgAction::Set)
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("casebook")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli_about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli_lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help(t!("arg_config", locale = locale).to_string())
                .value_name("CONFIG")
                .default_value(DEFAULT_CONFIG_FILE)
                .value_parser(clap::value_parser!(PathBuf))
                .global(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .help(t!("arg_db", locale = locale).to_string())
                .value_name("DATABASE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd_init_about", locale = locale).to_string())
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg_force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("case")
                .about(t!("cmd_case_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about(t!("cmd_case_add_about", locale = locale).to_string())
                        .arg(text_arg("title", t!("arg_title", locale = locale).to_string()).required(true))
                        .arg(text_arg("description", t!("arg_description", locale = locale).to_string())),
                )
                .subcommand(Command::new("list").about(t!("cmd_case_list_about", locale = locale).to_string()))
                .subcommand(
                    Command::new("delete")
                        .about(t!("cmd_case_delete_about", locale = locale).to_string())
                        .arg(id_arg("id", t!("arg_case_id", locale = locale).to_string())),
                ),
        )
        .subcommand(
            Command::new("step")
                .about(t!("cmd_step_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about(t!("cmd_step_add_about", locale = locale).to_string())
                        .arg(id_arg("case", t!("arg_case_id", locale = locale).to_string()))
                        .arg(text_arg("text", t!("arg_step_text", locale = locale).to_string()).required(true))
                        .arg(text_arg("expected", t!("arg_expected", locale = locale).to_string()).required(true))
                        .arg(text_arg("slug", t!("arg_slug", locale = locale).to_string())),
                )
                .subcommand(
                    Command::new("delete")
                        .about(t!("cmd_step_delete_about", locale = locale).to_string())
                        .arg(id_arg("id", t!("arg_step_id", locale = locale).to_string())),
                ),
        )
        .subcommand(
            Command::new("env")
                .about(t!("cmd_env_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .about(t!("cmd_env_add_about", locale = locale).to_string())
                        .arg(text_arg("title", t!("arg_title", locale = locale).to_string()).required(true))
                        .arg(text_arg("url", t!("arg_url", locale = locale).to_string()).required(true))
                        .arg(text_arg("description", t!("arg_description", locale = locale).to_string())),
                )
                .subcommand(Command::new("list").about(t!("cmd_env_list_about", locale = locale).to_string()))
                .subcommand(
                    Command::new("var")
                        .about(t!("cmd_env_var_about", locale = locale).to_string())
                        .arg(id_arg("env", t!("arg_env_id", locale = locale).to_string()))
                        .arg(text_arg("name", t!("arg_var_name", locale = locale).to_string()).required(true))
                        .arg(text_arg("value", t!("arg_var_value", locale = locale).to_string()).required(true)),
                ),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd_run_about", locale = locale).to_string())
                .subcommand_required(true)
                .subcommand(
                    Command::new("start")
                        .about(t!("cmd_run_start_about", locale = locale).to_string())
                        .arg(id_arg("env", t!("arg_env_id", locale = locale).to_string()))
                        .arg(text_arg("notes", t!("arg_notes", locale = locale).to_string())),
                )
                .subcommand(
                    Command::new("view")
                        .about(t!("cmd_run_view_about", locale = locale).to_string())
                        .arg(id_arg("run", t!("arg_run_id", locale = locale).to_string()))
                        .arg(
                            Arg::new("idx")
                                .help(t!("arg_idx", locale = locale).to_string())
                                .default_value("0")
                                .value_parser(clap::value_parser!(usize))
                                .action(ArgAction::Set),
                        ),
                )
                .subcommand(
                    Command::new("record")
                        .about(t!("cmd_run_record_about", locale = locale).to_string())
                        .arg(id_arg("run", t!("arg_run_id", locale = locale).to_string()))
                        .arg(
                            Arg::new("idx")
                                .help(t!("arg_idx", locale = locale).to_string())
                                .required(true)
                                .value_parser(clap::value_parser!(usize))
                                .action(ArgAction::Set),
                        )
                        .arg(
                            text_arg("status", t!("arg_status", locale = locale).to_string())
                                .short('s')
                                .required(true),
                        )
                        .arg(text_arg("notes", t!("arg_notes", locale = locale).to_string()).short('n')),
                )
                .subcommand(
                    Command::new("walk")
                        .about(t!("cmd_run_walk_about", locale = locale).to_string())
                        .arg(id_arg("run", t!("arg_run_id", locale = locale).to_string()))
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .help(t!("arg_from", locale = locale).to_string())
                                .value_name("IDX")
                                .default_value("0")
                                .value_parser(clap::value_parser!(usize))
                                .action(ArgAction::Set),
                        ),
                )
                .subcommand(
                    Command::new("summary")
                        .about(t!("cmd_run_summary_about", locale = locale).to_string())
                        .arg(id_arg("run", t!("arg_run_id", locale = locale).to_string()))
                        .arg(
                            Arg::new("html")
                                .long("html")
                                .help(t!("arg_html", locale = locale).to_string())
                                .value_name("HTML")
                                .value_parser(clap::value_parser!(PathBuf))
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new("report")
                                .long("report")
                                .help(t!("arg_report", locale = locale).to_string())
                                .conflicts_with("html")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .help(t!("arg_json", locale = locale).to_string())
                                .action(ArgAction::SetTrue),
                        ),
                ),
        )
        .subcommand(Command::new("runs").about(t!("cmd_runs_about", locale = locale).to_string()))
}

/// Loads the configuration, resolves the locale and opens the database.
fn open_session(matches: &ArgMatches) -> Result<Session> {
    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = config::load_config(&config_path)?;

    let explicit_lang = matches
        .get_one::<String>("lang")
        .cloned()
        .unwrap_or_else(|| config.language.clone());
    let locale = crate::init(Some(&explicit_lang));

    let db_path = match matches.get_one::<String>("db") {
        Some(raw) => crate::infra::fs::expand_path(raw)?,
        None => config.database_path()?,
    };
    ensure_parent_dir(&db_path)?;
    let store = Store::open(&db_path).with_context(|| {
        t!("db_open_failed", locale = &locale, path = db_path.display()).to_string()
    })?;

    Ok(Session {
        store,
        config,
        locale,
    })
}

pub fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first so help text is localized.
    let language = crate::init(pre_parse_language().as_deref());
    let matches = build_cli(&language).get_matches();
    dispatch(&matches)
}

/// Runs the command selected by `matches`.
pub fn dispatch(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("init", init_matches)) => {
            let config_path = matches
                .get_one::<PathBuf>("config")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            let lang = matches.get_one::<String>("lang").map(String::as_str);
            let locale = crate::init(lang);
            commands::init::execute(&config_path, init_matches.get_flag("force"), &locale)
        }
        Some(("case", sub)) => {
            let mut session = open_session(matches)?;
            commands::catalog::case(&mut session, sub)
        }
        Some(("step", sub)) => {
            let mut session = open_session(matches)?;
            commands::catalog::step(&mut session, sub)
        }
        Some(("env", sub)) => {
            let mut session = open_session(matches)?;
            commands::catalog::env(&mut session, sub)
        }
        Some(("run", sub)) => {
            let mut session = open_session(matches)?;
            commands::run::execute(&mut session, sub)
        }
        Some(("runs", _)) => {
            let session = open_session(matches)?;
            commands::run::list(&session)
        }
        _ => {
            // Clap requires a subcommand, so this is unreachable in practice.
            Ok(())
        }
    }
}
