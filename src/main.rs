use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use femiverse::assistant::{ChatSession, FemiBot, GeminiProvider, ModelProvider};
use femiverse::config::AppConfig;
use femiverse::report::HealthReport;
use femiverse::server::{self, AppState};
use femiverse::symptom::{
    Advance, AnswerValue, Assessment, Question, QuestionKind, Questionnaire, RuleBook,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// YAML rule book replacing the built-in one
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Walk through the symptom checker in the terminal
    Check,
    /// Talk to FemiBot in the terminal
    Chat {
        /// The model to use
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Print the active rule book
    Rules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    match args.command {
        Commands::Serve { .. } => tracing_subscriber::fmt()
            .with_env_filter(server::env_filter(
                std::env::var("RUST_LOG").ok().as_deref(),
            ))
            .init(),
        _ => env_logger::init(),
    }

    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(rules) = args.rules {
        config.rules_file = Some(rules);
    }
    let rules = match &config.rules_file {
        Some(path) => {
            log::info!("Loading rule book from {}", path.display());
            RuleBook::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => RuleBook::builtin(),
    };

    match args.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let state = AppState::new(config, rules, Arc::new(GeminiProvider));
            server::serve(state, port).await?;
        }
        Commands::Check => run_check(rules).await?,
        Commands::Chat { model } => {
            if let Some(model) = model {
                config.model = model;
            }
            run_chat(&config).await?;
        }
        Commands::Rules => {
            for (i, rule) in rules.rules.iter().enumerate() {
                println!(
                    "{}. {} -> {} ({}%)\n   when {}",
                    i + 1,
                    rule.name,
                    rule.outcome.condition,
                    rule.outcome.confidence,
                    rule.when
                );
            }
            println!(
                "otherwise -> {} ({}%)",
                rules.fallback.condition, rules.fallback.confidence
            );
        }
    }

    Ok(())
}

async fn run_check(rules: RuleBook) -> anyhow::Result<()> {
    let mut questionnaire = Questionnaire::new(Arc::new(rules));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(question) = questionnaire.current().cloned() else {
            break;
        };
        println!(
            "\nQuestion {} of {} ({}% complete)",
            questionnaire.index() + 1,
            questionnaire.sequence().len(),
            questionnaire.progress()
        );
        println!("{}", question.prompt);
        if question.required {
            println!("(required)");
        }
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
        println!("Enter option number(s), 'b' to go back, or nothing to continue:");

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input == "b" {
            questionnaire.retreat();
            continue;
        }
        if !input.is_empty() {
            let recorded = parse_selection(&question, input)
                .and_then(|value| Ok(questionnaire.record_answer(&question.id, value)?));
            if let Err(e) = recorded {
                println!("{}", e);
                continue;
            }
        }

        match questionnaire.advance() {
            Advance::Next { .. } => {}
            Advance::Blocked => println!("This question is required."),
            Advance::Finished { result } => {
                print_assessment(&result);
                break;
            }
        }
    }
    Ok(())
}

/// Map "2" or "1,3" onto the question's option labels
fn parse_selection(question: &Question, input: &str) -> anyhow::Result<AnswerValue> {
    if question.kind == QuestionKind::Boolean {
        return match input.to_lowercase().as_str() {
            "y" | "yes" => Ok(AnswerValue::Flag(true)),
            "n" | "no" => Ok(AnswerValue::Flag(false)),
            other => bail!("'{}' is not yes or no", other),
        };
    }

    let mut labels = Vec::new();
    for part in input.split(',') {
        let n: usize = part
            .trim()
            .parse()
            .with_context(|| format!("'{}' is not an option number", part.trim()))?;
        match question.options.get(n.wrapping_sub(1)) {
            Some(label) => labels.push(label.clone()),
            None => bail!("{} is out of range", n),
        }
    }

    match question.kind {
        QuestionKind::Multiple => Ok(AnswerValue::choices(labels)),
        _ if labels.len() == 1 => Ok(AnswerValue::choice(labels.remove(0))),
        _ => bail!("choose exactly one option"),
    }
}

fn print_assessment(result: &Assessment) {
    println!("\n{} (confidence {}%)", result.condition, result.confidence);
    println!("{}", result.explanation);
    println!("\nRecommendations:");
    for r in &result.recommendations {
        println!("  - {}", r);
    }
    println!("\nNext steps:");
    for s in &result.next_steps {
        println!("  - {}", s);
    }
}

async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let Some(session) = config.session(None)? else {
        bail!("GEMINI_API_KEY (or GOOGLE_API_KEY) must be set");
    };
    log::info!("Using model: {}", session.model_name);

    let bot = FemiBot::new(GeminiProvider.model_for(&session)).with_generation(session.generation);
    let mut chat = ChatSession::new();
    println!("{}", chat.messages()[0].content);
    println!("\n(type /report to print a health report, /quit to leave)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/report" => match HealthReport::from_transcript(chat.messages(), chrono::Utc::now()) {
                Ok(report) => println!("{}\n\n{}", report.file_name(), report.render_text()),
                Err(e) => println!("{}", e),
            },
            input => {
                if let Some(reply) = chat.send(&bot, input).await {
                    println!("\nFemiBot: {}\n", reply.content);
                }
            }
        }
    }
    Ok(())
}
