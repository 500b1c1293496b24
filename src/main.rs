// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use structopt::StructOpt;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trend_harvest::display::TrendReport;
use trend_harvest::error::Error;
use trend_harvest::{Config, FileStore, KeyPair, Pipeline, Token, TwitterProvider};

#[derive(StructOpt)]
#[structopt(
    name = "trend-harvest",
    about = "Collects, ranks and groups the trending topics of one country"
)]
struct Args {
    /// Twitter API consumer key
    #[structopt(short = "k", long = "apikey", env = "TWITTER_API_KEY", hide_env_values = true)]
    api_key: String,
    /// Twitter API consumer secret
    #[structopt(short = "s", long = "apisecret", env = "TWITTER_API_SECRET", hide_env_values = true)]
    api_secret: String,
    /// Twitter API access token
    #[structopt(short = "a", long = "accesstoken", env = "TWITTER_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,
    /// Twitter API access token secret
    #[structopt(short = "t", long = "tokensecret", env = "TWITTER_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,
    /// Country name locations must have, e.g. "Brazil"
    #[structopt(long)]
    country: Option<String>,
    /// Country code locations must have, e.g. "BR"
    #[structopt(long = "country-code")]
    country_code: Option<String>,
    /// Directory the trend files are read from and written to
    #[structopt(long = "data-dir", parse(from_os_str))]
    data_dir: Option<PathBuf>,
    /// Fetch fresh trends even if a stored result exists
    #[structopt(long)]
    refresh: bool,
    /// Rebuild the result from the stored raw trends without calling Twitter
    #[structopt(long, conflicts_with = "refresh")]
    offline: bool,
    /// Enable debug logging
    #[structopt(short, long)]
    verbose: bool,
    /// Log format
    #[structopt(long = "log-format", default_value = "text", possible_values = &["text", "json"])]
    log_format: String,
}

fn init_logging(verbose: bool, format: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("trend_harvest=debug,info")
        } else {
            EnvFilter::new("trend_harvest=info,warn")
        }
    });

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn config_from(args: &Args) -> Result<Config, Error> {
    let mut config = Config::from_env()?;
    if let Some(country) = &args.country {
        config.country_name = country.clone();
    }
    if let Some(code) = &args.country_code {
        config.country_code = code.clone();
    }
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> Result<(), Error> {
    let config = config_from(&args)?;

    let token = Token::new(
        KeyPair::new(args.api_key, args.api_secret),
        KeyPair::new(args.access_token, args.token_secret),
    );
    if token.consumer.is_empty() || token.access.is_empty() {
        return Err(Error::InvalidConfig("all four credentials are required".to_string()));
    }

    let provider = TwitterProvider::new(config.api_base.clone(), token, config.request_timeout());
    let pipeline = Pipeline::new(provider, FileStore::new(&config.data_dir), &config);

    let trends = if args.offline {
        pipeline.rebuild_from_raw()?
    } else if args.refresh {
        pipeline.refresh().await?
    } else {
        pipeline.load_or_refresh().await?
    };

    print!("{}", TrendReport(&trends.trends));
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::from_args();
    init_logging(args.verbose, &args.log_format);

    if let Err(e) = run(args).await {
        error!(error = %e, "trend collection failed");
        std::process::exit(1);
    }
}
