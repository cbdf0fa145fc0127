//! ytscript - YouTube script extraction and Korean translation
//!
//! Fetches a video's captions (or recognizes its speech when there are
//! none), translates English scripts to Korean, saves both as text files
//! and plays the audio track in the background.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ytscript::channel::ChannelBrowser;
use ytscript::cli::{Args, Commands};
use ytscript::config::Config;
use ytscript::language::language_name;
use ytscript::media::VideoSourceFactory;
use ytscript::setup::{SetupManager, APP_DIR};
use ytscript::text::{preview, split_into_sentences};
use ytscript::workflow::{PipelineOutcome, ScriptRequest, ScriptResult, Workflow};

const PREVIEW_CHARS: usize = 2000;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Extract { url, title, output_dir, language, no_translate } => {
            let workflow = Workflow::new(config)?;
            let request = ScriptRequest {
                title,
                output_dir,
                language,
                translate: !no_translate,
                ..ScriptRequest::new(url)
            };

            let pb = spinner("Fetching script...")?;
            let outcome = workflow.run(&request).await;
            pb.finish_and_clear();

            match outcome {
                PipelineOutcome::Success(result) => print_result(&result),
                PipelineOutcome::Failure { kind, message } => {
                    anyhow::bail!("{} failure: {}", kind, message);
                }
            }
        }
        Commands::Play { url, wait } => {
            let workflow = Workflow::new(config)?;
            let handle = workflow.play(&url).await?;
            println!("Playing audio (pid {})", handle.pid);

            if wait {
                let status = handle.wait()?;
                info!("Player exited with {}", status);
            }
        }
        Commands::Channel { query, favorite, max_results } => {
            let query = match (&query, &favorite) {
                (Some(query), _) => query.clone(),
                (None, Some(name)) => match config.channels.favorite(name) {
                    Some(channel) => channel.url.clone(),
                    None => anyhow::bail!("No favorite channel named '{}'", name),
                },
                (None, None) => {
                    print_favorites(&config);
                    return Ok(());
                }
            };

            let source = Arc::from(VideoSourceFactory::create_source(config.fetcher.clone()));
            let browser = ChannelBrowser::new(
                source,
                max_results.unwrap_or(config.channels.max_results),
            );

            let pb = spinner("Listing channel...")?;
            let videos = browser.list(&query).await;
            pb.finish_and_clear();
            let videos = videos?;

            println!("\nLatest videos for {}:", query);
            println!("{:<4} {:<10} {:<60} {}", "#", "Duration", "Title", "URL");
            println!("{}", "-".repeat(120));
            for video in videos {
                println!(
                    "{:<4} {:<10} {:<60} {}",
                    video.index,
                    video.duration,
                    preview(&video.title, 57),
                    video.url
                );
            }
        }
        Commands::Check => {
            let setup_manager = SetupManager::new()?;
            let statuses = setup_manager.check_tools(&config);

            println!("\nExternal tools:");
            println!("{:<12} {:<40} {}", "Tool", "Purpose", "Status");
            println!("{}", "-".repeat(100));
            let mut missing = 0;
            for status in &statuses {
                let line = match &status.result {
                    Ok(version) => format!("OK ({})", version),
                    Err(e) => {
                        missing += 1;
                        format!("MISSING: {}", e)
                    }
                };
                println!("{:<12} {:<40} {}", status.name, status.purpose, line);
            }

            if missing > 0 {
                anyhow::bail!("{} tool(s) unavailable", missing);
            }
        }
        Commands::Models { download } => {
            let setup_manager = SetupManager::new()?;
            let models = setup_manager.get_available_models();

            println!("\nAvailable whisper.cpp models:");
            println!("{:<12} {:<22} {:<10} {:<10}", "Name", "Filename", "Size (MB)", "Status");
            println!("{}", "-".repeat(60));
            for model in &models {
                let status = if setup_manager.is_downloaded(model) { "Downloaded" } else { "Missing" };
                println!(
                    "{:<12} {:<22} {:<10.1} {:<10}",
                    model.name, model.filename, model.size_mb, status
                );
            }

            if download {
                let model = setup_manager.find_model(&config.transcriber.model)?;
                let path = setup_manager.download_model(&model).await?;
                println!("\nModel {} ready at {}", model.name, path.display());
            }
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                anyhow::bail!("{} already exists", path.display());
            }
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}

fn print_result(result: &ScriptResult) {
    let transcript = &result.transcript;

    println!("\nVideo:    {}", result.video.watch_url());
    println!("Source:   {}", transcript.source);
    println!("Language: {} ({})", language_name(&transcript.language), transcript.language);

    println!("\n--- Script preview ---");
    for sentence in split_into_sentences(&preview(&transcript.text, PREVIEW_CHARS)) {
        println!("{}", sentence);
    }

    if let Some(translation) = &result.translation {
        println!("\n--- Translation preview ---");
        for sentence in split_into_sentences(&preview(translation, PREVIEW_CHARS)) {
            println!("{}", sentence);
        }
    }

    println!("\nSaved script:      {}", result.artifacts.script.display());
    if let Some(path) = &result.artifacts.translated {
        println!("Saved translation: {}", path.display());
    }
    if let Some(error) = &result.translation_error {
        eprintln!("Translation failed: {}", error);
    }
}

fn print_favorites(config: &Config) {
    println!("\nFavorite channels:");
    for channel in &config.channels.favorites {
        println!("  {:<40} {}", channel.name, channel.url);
    }
    println!("\nPass a channel URL, @handle or name, or --favorite <name>.");
}

fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    Ok(pb)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(APP_DIR).join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "ytscript.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Logging initialized - console: {}, file: {}",
        log_level,
        log_dir.join("ytscript.log").display()
    );

    Ok(())
}
