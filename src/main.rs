use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use std::path::PathBuf;

use bionics::{
    describe_occupancy, ActivationOutcome, Anatomy, BionicCollection, BionicId, BionicLog,
    BionicRegistry, PowerBank, TickEvent, TraitId, TraitSet,
};

/// Traits the demo character's world knows about; stands in for the
/// external trait registry when validating content.
const KNOWN_TRAITS: &[&str] = &["HYPEROPIC", "MYOPIC", "FAST_HEALER", "NIGHT_VISION"];

/// Bionics the demo character has installed at start.
const DEMO_INSTALLS: &[&str] = &[
    "bio_power_storage",
    "bio_power_storage_mkII",
    "bio_batteries",
    "bio_flashlight",
    "bio_night_vision",
    "bio_eye_optic",
    "bio_armor_eyes",
    "bio_blade",
    "bio_laser",
    "bio_resonator",
    "bio_drain",
];

#[derive(Parser, Debug)]
#[command(name = "bionics")]
#[command(about = "Inspect bionic content data and run a demo character simulation")]
struct Args {
    /// Data directory overriding the embedded defaults (expects bionics.json)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// List loaded bionics and their slot occupancy, then exit
    #[arg(short, long)]
    list: bool,

    /// Random seed for the demo simulation
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Number of turns to simulate
    #[arg(short, long, default_value = "60")]
    ticks: u64,
}

fn main() {
    let args = Args::parse();

    let registry = match &args.data_dir {
        Some(dir) => BionicRegistry::load_from(dir),
        None => BionicRegistry::defaults(),
    };
    println!("Loaded {} bionic definitions", registry.len());

    let known_traits: HashSet<TraitId> =
        KNOWN_TRAITS.iter().map(|t| TraitId::new(*t)).collect();
    let warnings = registry.check(&known_traits);
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    if args.list {
        list_bionics(&registry);
        return;
    }

    run_demo(&registry, args.seed, args.ticks);
}

fn list_bionics(registry: &BionicRegistry) {
    for def in registry.iter() {
        println!("{} [{}] {}", def.id, def.mode.label(), def.name);
        let occupancy = describe_occupancy(def, "  occupies:", false);
        if !occupancy.is_empty() {
            println!("{}", occupancy);
        }
        if def.power_source {
            println!("  capacity: {}", def.capacity);
        }
        if !def.available_upgrades.is_empty() {
            let upgrades: Vec<String> =
                def.available_upgrades.iter().map(|u| u.to_string()).collect();
            println!("  upgrades: {}", upgrades.join(", "));
        }
    }
}

fn run_demo(registry: &BionicRegistry, seed: u64, ticks: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut log = BionicLog::new();

    let anatomy = Anatomy::humanoid();
    let mut traits: TraitSet = [TraitId::new("HYPEROPIC"), TraitId::new("FAST_HEALER")]
        .into_iter()
        .collect();
    let mut collection = BionicCollection::new();
    let taken = HashSet::new();

    for bionic in DEMO_INSTALLS {
        let id = BionicId::new(*bionic);
        match collection.install(&id, registry, &anatomy, &mut traits, &taken) {
            Ok(invlet) => log.log_surgery(0, &id, format!("installed {} ({})", id, invlet)),
            Err(e) => println!("Install failed: {}", e),
        }
    }

    let mut power = PowerBank::new(0);
    power.set_capacity(collection.power_capacity(registry));
    power.fill();
    println!(
        "Character ready: {} bionics, {} power capacity",
        collection.len(),
        power.capacity()
    );

    for tick in 1..=ticks {
        // a character poking at hotkeys now and then
        if rng.gen_bool(0.4) {
            let installed: Vec<BionicId> =
                collection.iter().map(|inst| inst.id.clone()).collect();
            let id = installed[rng.gen_range(0..installed.len())].clone();
            match collection.activate(&id, registry, &mut power) {
                Ok(outcome) => log.log_activation(tick, &id, outcome_message(&id, &outcome)),
                Err(e) => log.log_activation(tick, &id, e.to_string()),
            }
        }

        for event in collection.tick(registry, &mut power) {
            match event {
                TickEvent::ShutOff(id) => {
                    log.log_power(tick, &id, format!("{} shut down, power exhausted", id))
                }
                TickEvent::Lapsed(id) => {
                    log.log_power(tick, &id, format!("{} sputters for want of power", id))
                }
            }
        }
    }

    println!(
        "After {} turns: {}/{} power remaining",
        ticks,
        power.current(),
        power.capacity()
    );
    println!("--- recent events ---");
    for entry in log.recent_entries(25).into_iter().rev() {
        println!("[{:>4}] {} {}", entry.tick, entry.category.label(), entry.message);
    }
}

fn outcome_message(id: &BionicId, outcome: &ActivationOutcome) -> String {
    match outcome {
        ActivationOutcome::Fired { item } => format!("{} fires {}", id, item),
        ActivationOutcome::WeaponDrawn { item } => format!("{} deploys {}", id, item),
        ActivationOutcome::WeaponStowed { item } => format!("{} stows {}", id, item),
        ActivationOutcome::Activated => format!("{} switches on", id),
        ActivationOutcome::Pulsed => format!("{} pulses", id),
        ActivationOutcome::Deactivated => format!("{} switches off", id),
        ActivationOutcome::NoEffect => format!("{} does nothing", id),
    }
}
