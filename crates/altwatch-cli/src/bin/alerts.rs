//! Inspect low-altitude alerts on the altwatch server.

use altwatch_cli::AltwatchClient;
use altwatch_core::Alert;
use clap::Parser;

/// Show active alerts, alert history, or one aircraft's altitude status
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Altwatch server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Show the N most recent alerts instead of the active list
    #[arg(long, value_name = "N")]
    history: Option<usize>,

    /// Show altitude status for one aircraft
    #[arg(long, value_name = "CALLSIGN", conflicts_with = "history")]
    status: Option<String>,

    /// Run a monitor cycle before listing
    #[arg(long)]
    check: bool,

    /// Print raw JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = AltwatchClient::new(&args.url);

    if args.check {
        let raised = client.run_check().await?;
        println!("Monitor cycle raised {} alert(s)", raised.len());
    }

    if let Some(callsign) = &args.status {
        match client.altitude_status(callsign).await? {
            Some(status) if args.json => println!("{}", serde_json::to_string_pretty(&status)?),
            Some(status) => {
                let zone = status
                    .zone
                    .as_ref()
                    .map(|z| format!("{} ({})", z.zone, z.airport))
                    .unwrap_or_else(|| "none".to_string());
                println!("{}", status.callsign);
                println!("  Altitude:  {:.0}ft (minimum {:.0}ft)", status.altitude_ft, status.min_safe_altitude_ft);
                println!("  Position:  ({:.5}, {:.5})", status.position.latitude, status.position.longitude);
                println!("  Zone:      {} [{:?}]", zone, status.containment_source);
                println!("  Safe:      {}", if status.is_safe { "yes" } else { "NO" });
            }
            None => println!("Aircraft {} not found", callsign),
        }
        return Ok(());
    }

    let (title, alerts) = match args.history {
        Some(limit) => ("Alert history", client.alert_history(limit).await?),
        None => ("Active alerts", client.active_alerts().await?),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    println!("{} ({})", title, alerts.len());
    for alert in &alerts {
        print_alert(alert);
    }
    Ok(())
}

fn print_alert(alert: &Alert) {
    println!(
        "  {:<8} {:<10} {:>6.0}ft  ({:.5}, {:.5})  {}",
        alert.severity.as_str(),
        alert.callsign,
        alert.altitude_ft,
        alert.position.latitude,
        alert.position.longitude,
        alert.timestamp.format("%H:%M:%S"),
    );
}
