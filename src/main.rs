// algotty: step-by-step algorithm animations in the terminal

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use algotty::config::{Config, LoggingConfig};
use algotty::script::ProblemDocument;
use algotty::ui::App;

/// Command-line options
struct Args {
    problem: PathBuf,
    language: Option<String>,
    config: Option<PathBuf>,
}

fn print_usage(program_name: &str) {
    eprintln!(
        "Usage: {} <problem.json> [--language <lang>] [--config <file>]",
        program_name
    );
    eprintln!();
    eprintln!("Examples:");
    eprintln!(
        "  {} demos/bubble_sort.json              # Play the bubble sort walkthrough",
        program_name
    );
    eprintln!(
        "  {} demos/tree_traversal.json -l java   # Pick the Java solution",
        program_name
    );
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut problem = None;
    let mut language = None;
    let mut config = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--language" | "-l" => {
                let value = iter.next().ok_or("--language needs a value")?;
                language = Some(value.clone());
            }
            "--config" | "-c" => {
                let value = iter.next().ok_or("--config needs a value")?;
                config = Some(PathBuf::from(value));
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            path if problem.is_none() => problem = Some(PathBuf::from(path)),
            extra => return Err(format!("Unexpected argument '{}'", extra)),
        }
    }

    Ok(Args {
        problem: problem.ok_or("No problem file provided")?,
        language,
        config,
    })
}

/// Send logs to the configured file. Without one, logging stays off unless
/// `RUST_LOG` asks for it.
fn init_logging(logging: &LoggingConfig) -> io::Result<()> {
    let default_filter = if logging.file.is_some() {
        logging.level.as_str()
    } else {
        "off"
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = &logging.file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("algotty");

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            print_usage(program_name);
            std::process::exit(1);
        }
    };

    if !Path::new(&args.problem).exists() {
        eprintln!("Error: File '{}' not found", args.problem.display());
        print_usage(program_name);
        std::process::exit(1);
    }

    let config = match Config::discover(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.logging)?;

    let document = match ProblemDocument::load(&args.problem) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let session = match document.session(args.language.as_deref()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = App::new(document, session, &config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
