use crate::config::Settings;
use crate::github::GitHubClient;
use crate::harvest::{self, HarvestReport, SearchQuery};
use crate::Result;
use tracing::info;

/// Run a full harvest with the given settings
pub async fn harvest(settings: &Settings) -> Result<HarvestReport> {
    info!(
        "Harvesting '{}' from {} into {}",
        settings.harvest.keyword,
        settings.api.base_url,
        settings.harvest.output_dir.display()
    );

    let client = GitHubClient::new(settings.api.clone())?;
    let report = harvest::harvest(&client, &settings.harvest).await?;

    print_report(&report, settings);
    Ok(report)
}

/// Probe the endpoint with the unbounded query and report the match count
pub async fn check(settings: &Settings) -> Result<u64> {
    let client = GitHubClient::new(settings.api.clone())?;
    let query = SearchQuery::for_watermark(&settings.harvest.keyword, None);
    let total = client.total_count(&query).await?;

    println!(
        "\x1b[32m\u{2713}\x1b[0m Search endpoint reachable: {}",
        client.search_url()
    );
    println!("  Query: {query}");
    println!("  Matches reported: {total}");
    println!(
        "  Authentication: {}",
        if settings.api.token.is_some() {
            "token"
        } else {
            "anonymous"
        }
    );

    Ok(total)
}

fn print_report(report: &HarvestReport, settings: &Settings) {
    println!("\n========================================");
    println!("Harvest finished");
    println!("========================================");
    println!("Repositories: {}", report.repositories);
    println!("Users: {}", report.accounts);
    println!("Pages: {} across {} passes", report.pages, report.passes);
    match report.lowest_watermark {
        Some(stars) => println!("Lowest star cap: {stars}"),
        None => println!("Lowest star cap: none"),
    }
    println!("Output: {}", settings.harvest.output_dir.display());
    println!("========================================\n");
}
