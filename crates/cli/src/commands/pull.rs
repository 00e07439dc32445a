use alertdeck_core::{
    config::AppConfig, mapper::Mappers, upstream::probe, upstream::HttpClient, Poller, Snapshot,
};
use std::sync::Arc;

use super::utils::{print_error, print_info, print_success, select_instances, CliError, CliResult};

/// Output format of the `pull` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Summary,
    Json,
}

fn http_client(config: &AppConfig) -> CliResult<Arc<HttpClient>> {
    Ok(Arc::new(HttpClient::with_config(config.http_client_config())?))
}

/// Probes each selected instance and prints the mappers it would use.
pub async fn detect_versions(config: &AppConfig, only: &[String]) -> CliResult<()> {
    let client = http_client(config)?;
    let mappers = Mappers::builtin();

    for instance in select_instances(config, only)? {
        let version = probe::detect(&client, &instance).await;
        let label = if version.is_latest_sentinel() {
            format!("{version} (unknown, assuming latest)")
        } else {
            version.to_string()
        };
        println!("{}: {label}", instance.name);

        match (mappers.resolve_alerts(&version), mappers.resolve_silences(&version)) {
            (Ok(alerts), Ok(silences)) => {
                println!("  alerts mapper:   {alerts:?}");
                println!("  silences mapper: {silences:?}");
            }
            (Err(e), _) | (_, Err(e)) => print_error(&e.to_string()),
        }
    }
    Ok(())
}

/// Runs exactly one pull cycle per selected instance.
///
/// Instances are pulled concurrently. Returns an error if any cycle failed,
/// after printing every result.
pub async fn pull_once(config: &AppConfig, only: &[String], format: OutputFormat) -> CliResult<()> {
    let client = http_client(config)?;
    let transforms =
        Arc::new(config.transforms().map_err(|e| CliError::Config(e.to_string()))?);
    let mappers = Arc::new(Mappers::builtin());

    let pollers: Vec<Poller> = select_instances(config, only)?
        .into_iter()
        .map(|instance| {
            Poller::new(instance, client.clone())
                .with_mappers(mappers.clone())
                .with_transforms(transforms.clone())
        })
        .collect();

    let mut tasks = tokio::task::JoinSet::new();
    for poller in pollers {
        tasks.spawn(async move {
            let result = poller.pull().await;
            (poller, result)
        });
    }

    let mut failures = 0usize;
    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (poller, result) = joined.map_err(|e| CliError::General(e.to_string()))?;
        if result.is_err() {
            failures += 1;
        }
        results.push((poller.instance().name.to_string(), poller.store().snapshot()));
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));

    match format {
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = results
                .iter()
                .map(|(name, snapshot)| {
                    Ok((name.clone(), serde_json::to_value(snapshot.as_ref())?))
                })
                .collect::<Result<_, serde_json::Error>>()?;
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Summary => {
            for (name, snapshot) in &results {
                print_summary(name, snapshot);
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Upstream(format!("{failures} instance(s) failed to pull")));
    }
    Ok(())
}

fn print_summary(name: &str, snapshot: &Snapshot) {
    if !snapshot.error.is_empty() {
        print_error(&format!("{name}: {}", snapshot.error));
        return;
    }

    let alerts: usize = snapshot.alert_groups.iter().map(|g| g.alerts.len()).sum();
    let silenced: usize = snapshot.alert_groups.iter().map(|g| g.silenced_count).sum();
    print_success(&format!(
        "{name}: version {}",
        snapshot.version.as_deref().unwrap_or("unknown")
    ));
    print_info(&format!(
        "  {} group(s), {alerts} alert(s), {silenced} silenced, {} silence(s)",
        snapshot.alert_groups.len(),
        snapshot.silences.len()
    ));
    for group in &snapshot.alert_groups {
        let labels: Vec<String> = group.labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!(
            "    [{}] {} ({} alert(s))",
            &group.id[..12.min(group.id.len())],
            labels.join(" "),
            group.alerts.len()
        );
    }
}
