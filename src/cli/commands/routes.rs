//! Routes command - print the discovered route map without writing anything.

use std::path::PathBuf;

use crate::config::Settings;

pub async fn run(settings: Settings, app_dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let routes = super::pipeline_for(settings, app_dir)?.build().await?;

    if json {
        println!("{}", routes.to_json_pretty()?);
        return Ok(());
    }

    let width = routes.paths().map(str::len).max().unwrap_or(0);
    for (path, route) in routes.iter() {
        if route.is_dynamic {
            let params: Vec<&str> = route.param_names().collect();
            println!("{path:<width$}  dynamic [{}]", params.join(", "));
        } else {
            println!("{path:<width$}  static");
        }
    }
    println!("\n{} routes", routes.len());
    Ok(())
}
