//! One-shot competitor search from the terminal.

use crate::config::Config;
use crate::models::search::SearchRequest;
use crate::state::SharedState;

pub async fn cmd_search(
    config: Config,
    niche: String,
    platforms: Vec<String>,
    hashtags: Vec<String>,
) -> anyhow::Result<()> {
    let state = SharedState::new(config)?;
    let request = SearchRequest {
        niche,
        platforms,
        hashtags,
    };

    eprintln!(
        "Searching {} for '{}'...",
        request.platforms.join(", "),
        request.niche
    );

    let outcome = state.competitor_search.search(request).await?;
    let response = outcome.response.as_ref();

    println!("{}", serde_json::to_string_pretty(response)?);

    eprintln!("{:-<60}", "");
    for result in &response.results {
        eprintln!(
            "• {}: {} profiles",
            result.platform.display_name(),
            result.influencers.len()
        );
    }
    for insight in &response.insights {
        eprintln!("  {insight}");
    }
    for error in &response.errors {
        eprintln!("✗ {error}");
    }

    Ok(())
}
