use anyhow::Result;
use clap::{App, Arg, SubCommand};

mod commands;
mod config;

use commands::ExplorerCommands;
use config::Config;

fn main() -> Result<()> {
    let matches = App::new("Stakeboard Explorer CLI")
        .version("1.0")
        .about("Inspect staking nodes, performance scores and delegations")
        .subcommand(
            SubCommand::with_name("leaderboard")
                .about("Show the aggregated node table or a regional score ranking")
                .arg(
                    Arg::with_name("region")
                        .short("r")
                        .long("region")
                        .value_name("CODE")
                        .help("Region code, e.g. FRA")
                        .takes_value(true),
                )
                .arg(
                    Arg::with_name("limit")
                        .short("l")
                        .long("limit")
                        .value_name("N")
                        .help("Maximum number of rows")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("node")
                .about("Show the aggregated stat view for one node")
                .arg(
                    Arg::with_name("address")
                        .value_name("ADDRESS")
                        .help("Node address")
                        .required(true)
                        .index(1),
                ),
        )
        .get_matches();

    let config = Config::load()?;
    let commands = ExplorerCommands::new(config.aggregator.clone());
    let runtime = tokio::runtime::Runtime::new()?;

    match matches.subcommand() {
        ("leaderboard", Some(sub)) => {
            let limit = sub
                .value_of("limit")
                .and_then(|v| v.parse().ok())
                .unwrap_or(config.default_limit);
            runtime.block_on(commands.leaderboard(sub.value_of("region"), limit))
        }
        ("node", Some(sub)) => {
            let address = sub.value_of("address").expect("address is required");
            runtime.block_on(commands.node(address))
        }
        _ => {
            eprintln!("{}", matches.usage());
            Ok(())
        }
    }
}
