use anyhow::{anyhow, Result};

use node_aggregator::build_services;
use node_aggregator::config::AggregatorConfig;
use node_aggregator::models::score::KNOWN_REGIONS;
use node_aggregator::services::leaderboard_service::LeaderboardService;
use node_aggregator::sources::traits::ScoreSource;
use node_aggregator::utils::format::{
    abbreviate_address, abbreviate_number, format_percent, format_ratio, format_score, NOT_AVAILABLE,
};

pub struct ExplorerCommands {
    config: AggregatorConfig,
}

impl ExplorerCommands {
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Print the per-region score ranking, or the aggregated node table
    /// when no region is given.
    pub async fn leaderboard(&self, region: Option<&str>, limit: usize) -> Result<()> {
        let (aggregator, scores) = build_services(&self.config)?;

        match region {
            Some(region) => {
                let snapshot = scores.snapshot().await?;
                let metadata = scores.regions().await.unwrap_or_default();
                let leaderboard = LeaderboardService::new(metadata);

                let rows = leaderboard.regional_leaderboard(&snapshot, region);
                if rows.is_empty() {
                    println!("no scores reported for region {region}");
                    let upper = region.to_uppercase();
                    if !KNOWN_REGIONS.contains(&upper.as_str()) {
                        println!("known regions: {}", KNOWN_REGIONS.join(", "));
                    }
                    return Ok(());
                }

                println!("{:<4} {:<16} {:>8}", "#", "node", "score");
                for (rank, row) in rows.iter().take(limit).enumerate() {
                    println!(
                        "{:<4} {:<16} {:>8}",
                        rank + 1,
                        abbreviate_address(&row.address),
                        format_score(Some(row.score)),
                    );
                }
            }
            None => {
                let output = aggregator.aggregate().await?;
                println!(
                    "{:<16} {:>10} {:>10} {:>8} {:>8} {:>8}",
                    "node", "stake", "delegated", "top", "reward", "calls"
                );
                for record in output.records.iter().take(limit) {
                    println!(
                        "{:<16} {:>10} {:>10} {:>8} {:>8} {:>8}",
                        record
                            .ens
                            .name
                            .clone()
                            .unwrap_or_else(|| abbreviate_address(&record.address)),
                        abbreviate_number(record.total_stake, 3),
                        abbreviate_number(record.delegated_stake, 3),
                        format_score(record.current_high_score),
                        format_percent(record.reward_cut_fraction),
                        format_ratio(record.reward_call_count, record.reward_call_denominator),
                    );
                }
            }
        }
        Ok(())
    }

    /// Print the aggregated stat view for a single node.
    pub async fn node(&self, address: &str) -> Result<()> {
        let (aggregator, scores) = build_services(&self.config)?;
        let output = aggregator.aggregate().await?;

        let record = output
            .records
            .iter()
            .find(|r| r.address.eq_ignore_ascii_case(address))
            .ok_or_else(|| anyhow!("{address} is not in the active set"))?;

        let metadata = scores.regions().await.unwrap_or_default();
        let leaderboard = LeaderboardService::new(metadata);
        let node_scores = output.snapshot.nodes.get(&record.address);

        println!("node            {}", record.address);
        if let Some(name) = &record.ens.name {
            println!("name            {name}");
        }
        if let Some(username) = &record.username {
            println!("username        {username}");
        }
        println!("total stake     {}", abbreviate_number(record.total_stake, 3));
        println!("self stake      {}", abbreviate_number(record.self_stake, 3));
        println!(
            "delegated       {}",
            abbreviate_number(record.delegated_stake, 3)
        );
        println!(
            "earned fees     {} ETH",
            abbreviate_number(record.total_volume_eth, 3)
        );

        match node_scores.map(|s| leaderboard.top_regional_score(s)) {
            Some(top) if top.score > 0.0 => {
                println!("top region      {} ({})", top.region, format_score(Some(top.score)))
            }
            _ => println!("top region      {NOT_AVAILABLE}"),
        }
        match node_scores.and_then(|s| leaderboard.top_ai_score(s)) {
            Some(ai) => println!(
                "top AI region   {} ({}) via {} / {}",
                ai.region,
                format_score(Some(ai.value)),
                ai.pipeline,
                ai.model
            ),
            None => println!("top AI region   {NOT_AVAILABLE}"),
        }

        println!(
            "reward cut      {}",
            format_percent(record.reward_cut_fraction)
        );
        println!("fee cut         {}", format_percent(record.fee_cut_fraction));
        println!(
            "reward calls    {}",
            format_ratio(record.reward_call_count, record.reward_call_denominator)
        );
        println!("delegators      {}", record.total_delegators);

        Ok(())
    }
}
