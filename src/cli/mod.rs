//! Command-line interface for Trendscout.

mod commands;

use clap::{Parser, Subcommand};

/// Trendscout - competitor discovery across Instagram, TikTok and YouTube
#[derive(Parser)]
#[command(name = "trendscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "-d", alias = "--daemon")]
    Serve,

    /// Run one competitor search and print the JSON response
    #[command(alias = "s")]
    Search {
        /// Niche to search for
        #[arg(long, short)]
        niche: String,

        /// Platform to scrape; repeat for several (instagram, tiktok, youtube)
        #[arg(long = "platform", short, required = true)]
        platforms: Vec<String>,

        /// Hashtag to search instead of the niche; only the first is used
        #[arg(long = "hashtag", short = 't')]
        hashtags: Vec<String>,
    },

    /// Write a default config.toml if none exists
    Init,
}

pub use commands::*;
