use crate::{
    core::{Conversation, RelayClient, DEFAULT_RELAY_URL},
    emergency,
    server::run_server,
    Itinerary, RelayConfig, RelayError, TripPreferences,
};
use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, io::Write, net::SocketAddr, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    let relay_url = Arg::new("relay-url")
        .short('u')
        .long("relay-url")
        .value_name("URL")
        .global(true)
        .help("Relay endpoint (or set YATRA_RELAY_URL)");

    let timeout = Arg::new("timeout")
        .short('t')
        .long("timeout")
        .value_name("SECONDS")
        .global(true)
        .value_parser(clap::value_parser!(u64))
        .help("Request timeout in seconds (default 60)");

    Command::new("yatra")
        .version(env!("CARGO_PKG_VERSION"))
        .about("AI relay and client for planning a trip to India")
        .subcommand_required(true)
        .arg(relay_url)
        .arg(timeout)
        .subcommand(
            Command::new("serve")
                .about("Run the relay in front of the Gemini API")
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .value_parser(clap::value_parser!(SocketAddr))
                        .help("Listen address (or set YATRA_BIND)"),
                )
                .arg(
                    Arg::new("min-interval-ms")
                        .long("min-interval-ms")
                        .value_name("MILLIS")
                        .value_parser(clap::value_parser!(u64))
                        .help("Minimum spacing between upstream calls, 0 disables"),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .value_name("MODEL")
                        .help("Gemini model name (or set GEMINI_MODEL)"),
                ),
        )
        .subcommand(
            Command::new("ask")
                .about("Send a single prompt")
                .arg(Arg::new("prompt").required(true).index(1))
                .arg(
                    Arg::new("system")
                        .short('s')
                        .long("system")
                        .value_name("TEXT")
                        .help("Optional system instructions"),
                ),
        )
        .subcommand(
            Command::new("itinerary")
                .about("Generate a day-by-day itinerary")
                .arg(Arg::new("city").long("city").required(true).value_name("CITY"))
                .arg(
                    Arg::new("days")
                        .long("days")
                        .required(true)
                        .value_name("N")
                        .value_parser(clap::value_parser!(u32)),
                )
                .arg(
                    Arg::new("interest")
                        .long("interest")
                        .value_name("INTEREST")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("budget").long("budget").default_value("moderate"))
                .arg(Arg::new("style").long("style").default_value("balanced"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the itinerary as JSON"),
                ),
        )
        .subcommand(
            Command::new("translate")
                .about("Translate a phrase into an Indian language")
                .arg(Arg::new("text").required(true).index(1))
                .arg(
                    Arg::new("to")
                        .long("to")
                        .value_name("LANGUAGE")
                        .default_value("Hindi"),
                ),
        )
        .subcommand(
            Command::new("guide")
                .about("Ask the cultural etiquette guide; without a question, start a chat")
                .arg(Arg::new("question").index(1)),
        )
        .subcommand(Command::new("emergency").about("Show emergency numbers and phrases"))
}

/// CLI entry point for the yatra tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("serve", sub)) => serve(sub).await,
        Some(("emergency", _)) => {
            print_emergency();
            Ok(())
        }
        Some((name, sub)) => {
            let client = client_from(&matches);
            let outcome = match name {
                "ask" => ask(&client, sub).await,
                "itinerary" => itinerary(&client, sub).await,
                "translate" => translate(&client, sub).await,
                "guide" => guide(&client, sub).await,
                other => unreachable!("unhandled subcommand {other}"),
            };
            outcome.map_err(|err| {
                error!(category = %err.category(), "{}", err);
                anyhow::anyhow!(err.user_message())
            })
        }
        None => unreachable!("subcommand_required"),
    }
}

fn client_from(matches: &ArgMatches) -> RelayClient {
    let endpoint = matches
        .get_one::<String>("relay-url")
        .cloned()
        .or_else(|| env::var("YATRA_RELAY_URL").ok())
        .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string());
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(60);

    RelayClient::new(endpoint).with_timeout(Duration::from_secs(timeout))
}

async fn serve(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = RelayConfig::from_env().context("invalid relay configuration")?;
    if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
        config = config.with_bind(*bind);
    }
    if let Some(ms) = matches.get_one::<u64>("min-interval-ms") {
        config = config.with_min_interval(Duration::from_millis(*ms));
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config = config.with_model(model.clone());
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config = config.with_upstream_timeout(Duration::from_secs(*timeout));
    }

    info!("Starting relay with {:?}", config);
    run_server(config).await
}

async fn ask(client: &RelayClient, matches: &ArgMatches) -> Result<(), RelayError> {
    let prompt = required(matches, "prompt");
    let system = matches.get_one::<String>("system").map(String::as_str);
    let text = client.invoke(prompt, system).await?;
    println!("{text}");
    Ok(())
}

async fn itinerary(client: &RelayClient, matches: &ArgMatches) -> Result<(), RelayError> {
    let days = matches.get_one::<u32>("days").copied().unwrap_or(1);
    let interests: Vec<String> = matches
        .get_many::<String>("interest")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let preferences = TripPreferences::new(required(matches, "city"), days)
        .with_interests(interests)
        .with_budget(required(matches, "budget"))
        .with_travel_style(required(matches, "style"));

    let plan = client.generate_itinerary(&preferences).await?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_itinerary(&preferences, &plan);
    }
    Ok(())
}

async fn translate(client: &RelayClient, matches: &ArgMatches) -> Result<(), RelayError> {
    let text = client
        .translate(required(matches, "text"), required(matches, "to"))
        .await?;
    println!("{text}");
    Ok(())
}

async fn guide(client: &RelayClient, matches: &ArgMatches) -> Result<(), RelayError> {
    let mut conversation = Conversation::new();

    if let Some(question) = matches.get_one::<String>("question") {
        let reply = client.continue_conversation(&mut conversation, question).await?;
        println!("{reply}");
        return Ok(());
    }

    println!("Ask about Indian customs and etiquette. Empty line to quit.");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 || line.trim().is_empty() {
            break;
        }

        match client.continue_conversation(&mut conversation, line.trim()).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(err) => println!("\n{}\n", err.user_message()),
        }
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn print_itinerary(preferences: &TripPreferences, plan: &Itinerary) {
    println!(
        "\n{} days in {} ({})",
        plan.days.len(),
        preferences.display_city(),
        plan.estimated_total_cost
    );
    for day in &plan.days {
        println!("\nDay {}: {}", day.day, day.label);
        for activity in &day.activities {
            println!("  {:<10} {} [{}]", activity.time, activity.description, activity.cost);
            println!("             safety: {}", activity.safety_note);
            println!("             culture: {}", activity.cultural_note);
        }
    }
    if !plan.tips.is_empty() {
        println!("\nTips:");
        for tip in &plan.tips {
            println!("  - {tip}");
        }
    }
}

fn print_emergency() {
    println!("Emergency numbers (India)");
    for contact in emergency::CONTACTS {
        println!("  {:<18} {}", contact.label, contact.number);
    }
    println!("\nQuick phrases");
    for phrase in emergency::PHRASES {
        println!(
            "  {:<22} {} ({})",
            phrase.english, phrase.hindi, phrase.transliteration
        );
    }
}
