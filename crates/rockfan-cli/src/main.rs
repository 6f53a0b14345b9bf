//! rockfan command line

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use rockfan_core::catalog;
use rockfan_core::prelude::*;
use rockfan_core::{LoggingLauncher, MediaLauncher, SpotifyLinks};
use rockfan_images::{GoogleImageSearch, ImageResolver, ResolutionCache};
use rockfan_segments::{spans, Segment};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command {
    Command::new("rockfan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generated rock stories with resolved images")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            Command::new("parse")
                .about("Split marked-up text into segments")
                .arg(Arg::new("file").value_name("FILE").help("Input file; stdin if omitted"))
                .arg(
                    Arg::new("spans")
                        .long("spans")
                        .action(ArgAction::SetTrue)
                        .help("Also print emphasis spans of text segments"),
                ),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve one image query to a URL")
                .arg(Arg::new("query").required(true).help("Image keywords"))
                .arg(
                    Arg::new("context")
                        .long("context")
                        .default_value("")
                        .help("Identity keywords, usually the band name"),
                ),
        )
        .subcommand(
            Command::new("story")
                .about("Generate a story")
                .arg(
                    Arg::new("band")
                        .long("band")
                        .help("Band to write about; a random favourite if omitted"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                )
                .arg(
                    Arg::new("play")
                        .long("play")
                        .action(ArgAction::SetTrue)
                        .help("Open the recommended track afterwards"),
                ),
        )
        .subcommand(
            Command::new("bands")
                .about("Band catalogue and favourites")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List catalogue bands"))
                .subcommand(
                    Command::new("select")
                        .about("Save favourite bands")
                        .arg(
                            Arg::new("band")
                                .required(true)
                                .num_args(1..)
                                .help("Catalogue band names"),
                        ),
                )
                .subcommand(Command::new("show").about("Show saved preferences")),
        )
        .subcommand(
            Command::new("play")
                .about("Open a track in the music player")
                .arg(Arg::new("artist").required(true))
                .arg(Arg::new("track").required(true)),
        )
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rockfan=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(matches: &ArgMatches) -> Result<RockfanConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => RockfanConfig::load(Path::new(path))
            .with_context(|| format!("loading config from {path}"))?,
        None => RockfanConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn build_resolver(config: &RockfanConfig) -> Result<ImageResolver> {
    let search = GoogleImageSearch::new(config.search.clone()).context("image search client")?;
    let resolver = ImageResolver::new(Arc::new(search), config.resolver.clone());

    Ok(if config.cache.enabled {
        resolver.with_cache(ResolutionCache::with_ttl(
            config.cache.capacity,
            Duration::from_secs(config.cache.ttl_secs),
        ))
    } else {
        resolver
    })
}

fn run_parse(config: &RockfanConfig, args: &ArgMatches) -> Result<()> {
    let text = match args.get_one::<String>("file") {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
            text
        }
    };

    let segments = config.parser()?.parse(&text);

    if args.get_flag("spans") {
        let annotated: Vec<_> = segments
            .iter()
            .map(|segment| match segment {
                Segment::Text { content } => serde_json::json!({
                    "segment": segment,
                    "spans": spans(content),
                }),
                other => serde_json::json!({ "segment": other }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&annotated)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&segments)?);
    }
    Ok(())
}

async fn run_resolve(config: &RockfanConfig, args: &ArgMatches) -> Result<()> {
    let query = args.get_one::<String>("query").map_or("", String::as_str);
    let context = args.get_one::<String>("context").map_or("", String::as_str);

    let resolution = build_resolver(config)?.resolve_detailed(query, context).await;

    tracing::info!(source = ?resolution.source, "resolved");
    println!("{}", resolution.url);
    Ok(())
}

async fn run_story(config: &RockfanConfig, args: &ArgMatches) -> Result<()> {
    let generator = GeminiGenerator::new(config.generator.clone()).context("generator client")?;
    let pipeline = StoryPipeline::new(
        Arc::new(generator),
        Arc::new(build_resolver(config)?),
        Arc::new(FilePreferences::new(&config.preferences_path)),
    )
    .with_parser(config.parser()?);
    let session = StorySession::new(pipeline);

    let state = match args.get_one::<String>("band") {
        Some(band) => session.generate_for(band).await,
        None => session.generate_daily().await,
    };

    let story = match state {
        StoryState::Success(story) => story,
        StoryState::Error(message) => bail!(message),
        StoryState::Idle | StoryState::Loading => bail!("story request did not finish"),
    };

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&story)?);
    } else {
        println!("{}\n", story.title);
        for segment in &story.segments {
            match segment {
                Segment::Text { content } => println!("{content}\n"),
                Segment::ResolvedImage { url, description } => println!("[{description}]({url})\n"),
                Segment::ImageRequest { query } => println!("[{query}]\n"),
                Segment::Track { artist, track, .. } => println!("♪ {artist} - {track}\n"),
            }
        }
    }

    if args.get_flag("play") {
        story.play(&LoggingLauncher);
    }
    Ok(())
}

async fn run_bands(config: &RockfanConfig, args: &ArgMatches) -> Result<()> {
    let store = FilePreferences::new(&config.preferences_path);

    match args.subcommand() {
        Some(("list", _)) => {
            for band in catalog::all_bands() {
                println!("{band}");
            }
        }
        Some(("select", args)) => {
            let mut bands = Vec::new();
            let mut unknown = Vec::new();
            for name in args.get_many::<String>("band").into_iter().flatten() {
                match catalog::find(name) {
                    Some(band) => bands.push(band.to_string()),
                    None => unknown.push(name.as_str()),
                }
            }
            if !unknown.is_empty() {
                bail!("not in the catalogue: {}", unknown.join(", "));
            }

            let preferences = store.save_bands(bands).await?;
            println!("Saved {} favourite bands", preferences.selected_bands.len());
        }
        Some(("show", _)) => {
            let preferences = store.read().await?;
            println!("{}", serde_json::to_string_pretty(&preferences)?);
        }
        _ => unreachable!("subcommand required"),
    }
    Ok(())
}

fn run_play(args: &ArgMatches) {
    let artist = args.get_one::<String>("artist").map_or("", String::as_str);
    let track = args.get_one::<String>("track").map_or("", String::as_str);

    let links = SpotifyLinks::for_track(artist, track);
    for link in links.chain() {
        println!("{link}");
    }
    LoggingLauncher.open(artist, track);
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = load_config(&matches)?;

    match matches.subcommand() {
        Some(("parse", args)) => run_parse(&config, args),
        Some(("resolve", args)) => run_resolve(&config, args).await,
        Some(("story", args)) => run_story(&config, args).await,
        Some(("bands", args)) => run_bands(&config, args).await,
        Some(("play", args)) => {
            run_play(args);
            Ok(())
        }
        _ => unreachable!("subcommand required"),
    }
}
