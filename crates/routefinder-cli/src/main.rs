use anyhow::{Context, Result};
use clap::Parser;
use routefinder_app::{
    CityForm, ConnectionForm, NetworkSeed, PathfinderController, PathfinderSettings, RevealFrame,
    RevealScheduler, SolveForm,
};
use routefinder_core::{CityId, ConnectionId, format_distance};
use routefinder_events::{Event, EventListener};
use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// City to start from
    #[arg(long)]
    from: String,

    /// City to reach
    #[arg(long)]
    to: String,

    /// JSON network file; the built-in sample network is used when omitted
    #[arg(short, long)]
    network: Option<PathBuf>,

    /// JSON settings file; defaults to the user config directory
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Extra city to add before solving (repeatable)
    #[arg(long = "city")]
    cities: Vec<String>,

    /// Extra connection as FROM,TO,DISTANCE[,bus|plane] (repeatable)
    #[arg(long = "connect")]
    connections: Vec<String>,

    /// Print the route without playing the reveal
    #[arg(long)]
    no_animate: bool,
}

/// Stands in for the graph canvas: keeps labels and prints reveal progress.
#[derive(Default)]
struct ConsoleCanvas {
    labels: HashMap<CityId, String>,
    highlighted: Vec<ConnectionId>,
    path_width: f32,
}

impl ConsoleCanvas {
    fn label(&self, id: CityId) -> &str {
        self.labels.get(&id).map(String::as_str).unwrap_or("?")
    }
}

impl EventListener for ConsoleCanvas {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::CityAdded { id, label } => {
                self.labels.insert(*id, label.clone());
            }
            Event::HighlightsCleared => self.highlighted.clear(),
            Event::ConnectionStyleChanged { id, width, .. } => {
                if *width >= self.path_width {
                    self.highlighted.push(*id);
                }
            }
            Event::RevealStep {
                index, from, to, ..
            } => {
                println!("  [{}] {} → {}", index + 1, self.label(*from), self.label(*to));
            }
            Event::RevealFinished => println!("Route revealed."),
            Event::RevealCancelled { completed_steps } => {
                println!("Reveal stopped after {completed_steps} step(s).")
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => PathfinderSettings::load_from(path)?,
        None => PathfinderSettings::load(),
    };
    tracing::debug!(?settings, "Loaded settings");
    let controller = PathfinderController::new(&settings);
    let bus = controller.event_bus().clone();
    let mut canvas = ConsoleCanvas {
        path_width: settings.style.highlight_width,
        ..Default::default()
    };

    let seed = match &args.network {
        Some(path) => NetworkSeed::load_from(path)?,
        None => NetworkSeed::sample(),
    };
    seed.apply(&controller)
        .context("Failed to build the network")?;

    for city in &args.cities {
        controller
            .add_city(&CityForm::new(city.as_str()))
            .with_context(|| format!("Failed to add city {city:?}"))?;
    }
    for raw in &args.connections {
        let form: ConnectionForm = raw.parse()?;
        controller
            .add_connection(&form)
            .with_context(|| format!("Failed to add connection {raw:?}"))?;
    }

    let snapshot = controller.snapshot();
    tracing::info!(
        cities = snapshot.cities.len(),
        connections = snapshot.connections.len(),
        "Network ready"
    );
    println!(
        "Network: {} cities, {} connections",
        snapshot.cities.len(),
        snapshot.connections.len()
    );

    let outcome = controller.solve(&SolveForm::new(args.from.as_str(), args.to.as_str()))?;
    bus.dispatch_to(&mut canvas);

    let solution = &outcome.solution;
    if !solution.is_reachable() {
        println!("No route between {} and {}.", args.from, args.to);
        return Ok(());
    }
    println!("Shortest Path: {}", solution.route_display());
    println!("Total Distance: {}", solution.distance_display());

    controller.with_store(|store| {
        for id in &canvas.highlighted {
            if let Some(edge) = store.connection(*id) {
                println!(
                    "  highlighted: {} – {} ({}, {})",
                    canvas.label(edge.from),
                    canvas.label(edge.to),
                    format_distance(edge.distance),
                    edge.mode
                );
            }
        }
    });

    if args.no_animate {
        return Ok(());
    }

    let frame = settings.reveal.frame_interval();
    let mut scheduler = RevealScheduler::new(outcome.reveal).with_event_bus(bus.clone());
    loop {
        let state = scheduler.tick(frame);
        bus.dispatch_to(&mut canvas);
        match state {
            RevealFrame::Moving { .. } => thread::sleep(frame),
            RevealFrame::Finished | RevealFrame::Cancelled { .. } => break,
        }
    }

    Ok(())
}
