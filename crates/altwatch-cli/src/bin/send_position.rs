//! Report a simulated descending aircraft to the altwatch server.
//!
//! Flies a straight track that sinks at a constant rate, so the aircraft
//! eventually crosses the minimum safe altitude and starts raising alerts.

use altwatch_cli::{AltwatchClient, DescendingTrack};
use altwatch_core::AircraftSnapshot;
use clap::Parser;
use std::time::Duration;
use tokio::time;

/// Send aircraft positions to the altwatch server (single descending track)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Altwatch server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Aircraft callsign
    #[arg(long, default_value = "N123AB")]
    callsign: String,

    /// Start latitude
    #[arg(long, default_value_t = 41.2)]
    lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = -73.4)]
    lon: f64,

    /// Heading in degrees (0 = north)
    #[arg(long, default_value_t = 90.0)]
    heading: f64,

    /// Ground speed in meters per second
    #[arg(long, default_value_t = 60.0)]
    speed: f64,

    /// Starting altitude in feet
    #[arg(long, default_value_t = 1500.0)]
    altitude: f64,

    /// Descent rate in feet per minute
    #[arg(long, default_value_t = 900.0)]
    descent: f64,

    /// Lowest altitude the track descends to, in feet
    #[arg(long, default_value_t = 300.0)]
    floor: f64,

    /// Duration in seconds
    #[arg(long, default_value_t = 90)]
    duration: u64,

    /// Update rate in Hz
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if !(args.rate.is_finite() && args.rate > 0.0) {
        anyhow::bail!("--rate must be a positive number");
    }

    println!("Connecting to altwatch server at {}...", args.url);
    let client = AltwatchClient::new(&args.url);

    let track = DescendingTrack::new(
        args.lat,
        args.lon,
        args.heading,
        args.speed,
        args.altitude,
        args.descent,
        args.floor,
    );

    println!("Starting descending track for {}", args.callsign);
    println!("  Start: ({}, {}) heading {}°", args.lat, args.lon, args.heading);
    println!(
        "  Altitude: {}ft -> {}ft at {}ft/min",
        args.altitude, args.floor, args.descent
    );
    if let Some(t) = track.time_to_cross(1000.0) {
        println!("  Crosses 1000ft after ~{:.0}s", t);
    }
    println!();

    let start = time::Instant::now();
    let mut update_count = 0u32;
    let mut interval = time::interval(Duration::from_secs_f64(1.0 / args.rate));

    loop {
        interval.tick().await;

        let elapsed = start.elapsed().as_secs_f64();
        if elapsed > args.duration as f64 {
            break;
        }

        let (lat, lon, alt) = track.position(elapsed);
        let snapshot = AircraftSnapshot::new(&args.callsign, alt, lat, lon);

        match client.report_position(&snapshot).await {
            Ok(_) => {
                update_count += 1;
                println!(
                    "[{:3}] Sent position ({:.6}, {:.6}) at {:.0}ft -> OK",
                    update_count, lat, lon, alt
                );
            }
            Err(e) => {
                eprintln!("Error sending position: {}", e);
            }
        }
    }

    println!("\nTrack complete. Sent {} position updates.", update_count);
    Ok(())
}
