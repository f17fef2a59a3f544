use std::fmt;
use std::io::{BufRead, Write};
use std::sync::Arc;

use devenglish_core::model::{CredentialsDraft, DeclaredCategory, LevelId, SignupDraft};
use devenglish_core::nav::Screen;
use services::{EmbeddedCatalog, SessionController, SessionError};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    db_url: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--memory]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:devenglish.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  DEVENGLISH_DB_URL");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = Some(
            std::env::var("DEVENGLISH_DB_URL")
                .ok()
                .map_or_else(|| "sqlite://devenglish.sqlite3".into(), normalize_sqlite_url),
        );

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = args.next().ok_or(ArgsError::MissingValue { flag: "--db" })?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(normalize_sqlite_url(value));
                }
                "--memory" => {
                    db_url = None;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { db_url })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn render(controller: &SessionController) {
    println!();
    if controller.screen().shows_progress_header() {
        let view = controller.progress_view();
        let indicator = if view.indicator.is_empty() {
            String::new()
        } else {
            format!("{} ", view.indicator)
        };
        println!("== {indicator}{} — {}% ==", view.user, view.total_display);
    }

    match controller.screen() {
        Screen::Home => {
            println!("DevEnglish Daily");
            println!("[start] Começar/Continuar  [about] Sobre  [quit] Sair");
        }
        Screen::Login => {
            println!("Entrar / Criar Conta");
            println!("login <usuário> <senha>   (senha: mínimo 8)");
        }
        Screen::Signup => {
            println!("Criar Conta");
            println!("signup <usuário> <senha> <masculine|feminine|undisclosed>");
        }
        Screen::LevelSelect => {
            println!("Selecione o nível:");
            for level in LevelId::ALL {
                println!(
                    "  open {:<13} {} — {}%",
                    level,
                    level.display_name(),
                    controller.level_percent_display(level)
                );
            }
        }
        Screen::Reading => {
            if let Some((position, total)) = controller.state().reading_position() {
                println!("{position} de {total}");
            }
            if let Some(phrase) = controller.state().current_phrase() {
                println!("  {}", phrase.en());
                println!("  {}", phrase.pt());
            } else {
                println!("(nenhuma frase neste nível)");
            }
            println!("[next] Próxima  [prev] Anterior  [back] Voltar");
        }
        Screen::LevelComplete => {
            let view = controller.progress_view();
            println!("🎉 Parabéns, {}!", view.user);
            println!("Você concluiu todas as frases deste nível. [back]");
        }
        Screen::CourseComplete => {
            let view = controller.progress_view();
            println!("🎓 Conclusão Total!");
            println!("Parabéns, {}! Você concluiu todos os níveis. [back]", view.user);
        }
        Screen::About => {
            println!("DevEnglish Daily — frases de inglês técnico para desenvolvedores.");
            println!("[back] Voltar");
        }
    }
}

fn parse_category(raw: &str) -> DeclaredCategory {
    match raw {
        "masculine" => DeclaredCategory::Masculine,
        "feminine" => DeclaredCategory::Feminine,
        "undisclosed" => DeclaredCategory::Undisclosed,
        _ => DeclaredCategory::Unset,
    }
}

async fn dispatch(controller: &mut SessionController, line: &str) {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return;
    };

    let result: Result<(), SessionError> = match (controller.screen(), command) {
        (_, "back") => {
            controller.go_back();
            Ok(())
        }
        (Screen::Home, "start") => {
            controller.choose_start();
            Ok(())
        }
        (Screen::Home, "about") => {
            controller.choose_about();
            Ok(())
        }
        (Screen::Login, "login") => {
            let username = parts.next().unwrap_or_default();
            let password = parts.next().unwrap_or_default();
            controller
                .submit_login(CredentialsDraft::new(username, password))
                .await
                .map(|_| ())
        }
        (Screen::Signup, "signup") => {
            let draft = SignupDraft {
                username: parts.next().unwrap_or_default().to_string(),
                password: parts.next().unwrap_or_default().to_string(),
                declared_category: parse_category(parts.next().unwrap_or_default()),
            };
            controller.submit_signup(draft).await.map(|_| ())
        }
        (Screen::LevelSelect, "open") => match parts.next().unwrap_or_default().parse::<LevelId>()
        {
            Ok(level) => controller.open_level(level).await.map(|_| ()),
            Err(err) => {
                println!("{err}");
                Ok(())
            }
        },
        (Screen::Reading, "next") => {
            controller.advance().await;
            Ok(())
        }
        (Screen::Reading, "prev") => {
            controller.retreat();
            Ok(())
        }
        _ => {
            println!("comando não reconhecido: {command}");
            Ok(())
        }
    };

    if let Err(err) = result {
        // Validation and content problems re-display the screen with a
        // message; they are never fatal.
        println!("Atenção: {err}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = match parsed.db_url {
        Some(db_url) => {
            prepare_sqlite_file(&db_url)?;
            Storage::sqlite(&db_url).await?
        }
        None => Storage::in_memory(),
    };

    let mut controller = SessionController::new(storage.profiles, Arc::new(EmbeddedCatalog::new()));

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        render(&controller);
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if matches!(line.trim(), "quit" | "sair") {
            break;
        }
        dispatch(&mut controller, &line).await;
    }

    // Give queued best-effort saves one last chance before exit.
    controller.flush_pending().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
