use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use transcript_lens::api::ApiServer;
use transcript_lens::{Config, Pipeline, Session};

fn source_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("YouTube video link (must carry a v= parameter)"),
        )
        .arg(
            Arg::new("srt")
                .short('s')
                .long("srt")
                .value_name("FILE")
                .help("Subtitle (.srt) file to use as the transcript"),
        )
        .group(ArgGroup::new("source").args(["url", "srt"]).required(true))
}

fn cli() -> Command {
    Command::new("Transcript Lens")
        .version(env!("CARGO_PKG_VERSION"))
        .author("TigreRoll")
        .about("Summaries, search, Q&A and quizzes over video transcripts")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file (default: search standard locations)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("serve")
                .about("Serve the web UI")
                .arg(Arg::new("host").long("host").value_name("ADDR").help("Bind address"))
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(clap::value_parser!(u16))
                        .help("Listen port"),
                ),
        )
        .subcommand(
            source_args(Command::new("summary").about("Summarize a transcript")).arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .value_name("FILE")
                    .help("Also write the summary to this markdown file"),
            ),
        )
        .subcommand(
            source_args(Command::new("search").about("Find sentences containing a keyword"))
                .arg(Arg::new("keyword").value_name("KEYWORD").required(true)),
        )
        .subcommand(
            source_args(Command::new("ask").about("Ask a question about a transcript"))
                .arg(Arg::new("question").value_name("QUESTION").required(true)),
        )
        .subcommand(
            source_args(Command::new("quiz").about("Generate a multiple-choice quiz")).arg(
                Arg::new("interactive")
                    .short('i')
                    .long("interactive")
                    .help("Answer the questions on stdin")
                    .action(ArgAction::SetTrue),
            ),
        )
}

/// `RUST_LOG` wins over the configured level
fn init_logging(config: &Config, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.output.log_filter(verbose)));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(matches: &ArgMatches) -> Result<Config> {
    match matches.get_one::<String>("config") {
        Some(path) => Config::load_from(path),
        None => Config::load().or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::from_env()
        }),
    }
}

async fn load_source(pipeline: &Pipeline, session: &mut Session, matches: &ArgMatches) -> Result<()> {
    if let Some(url) = matches.get_one::<String>("url") {
        let metadata = pipeline.load_from_url(session, url).await?;
        println!("📌 {}\n", metadata.title);
    } else if let Some(path) = matches.get_one::<String>("srt") {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| anyhow!("Cannot read {}: {}", path, e))?;
        pipeline.load_from_srt(session, &bytes, Some(path.clone()))?;
        info!("📄 Transcript loaded from {}", path);
    }
    Ok(())
}

async fn run_quiz(pipeline: &Pipeline, session: &mut Session, interactive: bool) -> Result<()> {
    let quiz = pipeline.generate_quiz(session).await?;
    if quiz.is_empty() {
        println!("The quiz came back empty, try again.");
        return Ok(());
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    for (index, question) in quiz.iter().enumerate() {
        println!("{}", question.question);
        for option in &question.options {
            println!("  {}", option);
        }

        if !interactive {
            println!("Correct Answer: {}\n", question.correct_answer);
            continue;
        }

        println!("Your answer (a-d):");
        let Some(line) = stdin.next_line().await? else {
            break;
        };
        let choice = line.trim().to_ascii_lowercase();
        let selection = question
            .options
            .iter()
            .find(|option| !choice.is_empty() && option.to_ascii_lowercase().starts_with(&choice))
            .cloned()
            .unwrap_or(choice);

        let feedback = pipeline.check_answer(session, index, &selection)?;
        println!("{}\n", feedback.message());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let matches = cli().get_matches();

    let mut config = load_config(&matches)?;
    init_logging(&config, matches.get_flag("verbose"));

    let (command, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("No command given"))?;

    if command == "serve" {
        if let Some(host) = sub.get_one::<String>("host") {
            config.server.host = host.clone();
        }
        if let Some(port) = sub.get_one::<u16>("port") {
            config.server.port = *port;
        }
    }

    config.validate()?;
    info!("🚀 Transcript Lens starting...");
    info!("{}", config.summary());

    let pipeline = Pipeline::from_config(&config).await?;

    if command == "serve" {
        return ApiServer::new(pipeline, config).start().await;
    }

    let mut session = Session::new();
    load_source(&pipeline, &mut session, sub).await?;

    match command {
        "summary" => {
            let summary = pipeline.summarize(&mut session).await?;
            println!("📝 Detailed Notes:\n\n{}", summary);
            if let Some(output) = sub.get_one::<String>("output") {
                tokio::fs::write(output, &summary).await?;
                info!("📥 Summary written to {}", output);
            }
        }
        "search" => {
            let keyword = sub
                .get_one::<String>("keyword")
                .ok_or_else(|| anyhow!("Missing keyword"))?;
            let hits = pipeline.search(&session, keyword)?;
            if hits.is_empty() {
                println!("No matches found.");
            } else {
                println!("Found {} result(s):", hits.len());
                for hit in hits {
                    println!("{}. {}", hit.rank, hit.highlighted);
                }
            }
        }
        "ask" => {
            let question = sub
                .get_one::<String>("question")
                .ok_or_else(|| anyhow!("Missing question"))?;
            let answer = pipeline.ask(&session, question).await?;
            println!("🤖 Answer\n\n{}", answer);
        }
        "quiz" => run_quiz(&pipeline, &mut session, sub.get_flag("interactive")).await?,
        other => return Err(anyhow!("Unknown command: {}", other)),
    }

    Ok(())
}
