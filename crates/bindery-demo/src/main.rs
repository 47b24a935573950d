//! `bindery-demo`: browse an in-memory topic catalog.
//!
//! ```text
//! bindery-demo list -o json -q "[?partitions > `10`].name"
//! bindery-demo describe orders
//! bindery-demo shout --times 3 hello
//! ```
//!
//! Set `RUST_LOG=bindery=debug` to see how handlers are bound.

use anyhow::Result;
use bindery::{
    info, ActionError, App, Args, CodedError, Command, CommandContext, Destination, Extensions,
    OptionSpec, TableRow,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, TableRow)]
struct Topic {
    #[header("Topic")]
    name: String,
    #[header("Partitions", number)]
    partitions: u32,
    #[header("Replicas", len)]
    replicas: Vec<u32>,
    #[header("Compacted")]
    compacted: bool,
    #[header("Owner", alt = "-")]
    owner: String,
}

const UNKNOWN_TOPIC: i32 = 404;

struct Catalog {
    cluster: String,
    topics: Vec<Topic>,
}

impl Catalog {
    fn sample() -> Self {
        let topic = |name: &str, partitions, replicas: &[u32], compacted, owner: &str| Topic {
            name: name.to_string(),
            partitions,
            replicas: replicas.to_vec(),
            compacted,
            owner: owner.to_string(),
        };
        Self {
            cluster: "local".into(),
            topics: vec![
                topic("orders", 48, &[1, 2, 3], false, "checkout"),
                topic("payments", 12, &[1, 2, 3], false, "billing"),
                topic("customers", 6, &[2, 3], true, ""),
                topic("clickstream", 2400, &[1, 2, 3], false, "analytics"),
                topic("audit", 1, &[1], true, "security"),
            ],
        }
    }
}

fn catalog(ctx: &CommandContext) -> Result<&Catalog> {
    ctx.app_state.get_required::<Catalog>()
}

fn app() -> App {
    let mut state = Extensions::new();
    state.insert(Catalog::sample());

    App::new("bindery-demo")
        .about("Browse an in-memory topic catalog")
        .app_state(state)
        .friendly_error(UNKNOWN_TOPIC, "no such topic, run `bindery-demo list` to see them all")
        .command(
            Command::new("list")
                .about("List topics")
                .printing_objects()
                .action(|ctx: CommandContext| -> Result<Vec<Topic>> {
                    Ok(catalog(&ctx)?.topics.clone())
                }),
        )
        .command(
            Command::new("describe")
                .about("Show one topic")
                .args_range(1, 1)
                .printing_objects()
                .action(|ctx: CommandContext, args: Args| -> Result<Topic> {
                    let name = &args[0];
                    catalog(&ctx)?
                        .topics
                        .iter()
                        .find(|t| &t.name == name)
                        .cloned()
                        .ok_or_else(|| {
                            CodedError::new(UNKNOWN_TOPIC, format!("topic {} not found", name))
                                .into()
                        })
                }),
        )
        .command(
            Command::new("shout")
                .about("Repeat the arguments, loudly")
                .option(OptionSpec::of::<u32>("times").short('t').help("How many times"))
                .required("times")
                .example("bindery-demo shout --times 3 hello")
                .printing_info()
                .action(|times: u32, args: Args| {
                    let text = args.join(" ").to_uppercase();
                    vec![text; times as usize].join(" ")
                }),
        )
        .command(
            Command::new("ping")
                .about("Check the cluster")
                .printing_info()
                .action(|ctx: CommandContext| -> Result<()> {
                    let cluster = &catalog(&ctx)?.cluster;
                    info::print_info(&ctx, &format!("{} is up", cluster))?;
                    Ok(())
                }),
        )
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match app().run(std::env::args_os(), Destination::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(ActionError::Parse(err)) => err.exit(),
        Err(err) => {
            debug!(?err, "command failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
