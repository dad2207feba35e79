//! Link command - build an href for a discovered route.

use std::path::PathBuf;

use crate::config::Settings;
use crate::routes::LinkOptions;

/// Arguments for the link command.
pub struct LinkArgs {
    pub route: String,
    pub params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub hash: Option<String>,
    pub app_dir: Option<PathBuf>,
}

pub async fn run(args: LinkArgs, settings: Settings) -> anyhow::Result<()> {
    let routes = super::pipeline_for(settings, args.app_dir)?.build().await?;

    let options = LinkOptions {
        params: &args.params,
        query: &args.query,
        hash: args.hash.as_deref(),
    };
    println!("{}", routes.link(&args.route, &options)?);
    Ok(())
}
