//! Convoy demo: route a column of units across a terrain map and report
//! how the planner's caches were used.
//!
//! Run: cargo run --bin convoy -- --units 12 --propulsion hover

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tilepath::{MoveSignature, MoveType, PlannerConfig, Point, Propulsion};
use tilepath_demos::{BUILTIN_MAP, Convoy, parse_tile};
use tilepath_terrain::{LakeRule, MapGen, TerrainMap};

/// Send a convoy of units across a map, one planner tick per step.
#[derive(Parser, Debug)]
#[command(about, version)]
struct Options {
    /// ASCII map file (`.` ground, `~` water, `#` cliff, digits are
    /// structures). The built-in map is used when absent.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Generate a random map of this size (`WIDTHxHEIGHT`) instead.
    #[arg(long, conflicts_with = "map")]
    random: Option<String>,

    /// Planner configuration as JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of units in the convoy.
    #[arg(short, long, default_value = "8")]
    units: usize,

    /// Number of ticks to simulate.
    #[arg(short, long, default_value = "30")]
    ticks: u32,

    /// Waypoints each unit advances per tick.
    #[arg(long, default_value = "1")]
    speed: usize,

    /// Propulsion of every unit (wheeled, half-tracked, tracked, legged,
    /// hover, lift, propellor).
    #[arg(short, long, default_value = "wheeled")]
    propulsion: String,

    /// Player owning the convoy.
    #[arg(long, default_value = "0")]
    owner: u8,

    /// Treat enemy structures as targets rather than obstacles.
    #[arg(long)]
    attack: bool,

    /// Destination tile as `x,y`. Defaults to the middle of the east edge.
    #[arg(short, long, value_parser = parse_tile)]
    dest: Option<Point>,

    /// Seed for unit placement and map generation.
    #[arg(long, default_value = "1")]
    seed: u64,
}

fn load_map(opts: &Options, rng: &mut StdRng) -> Result<TerrainMap, Box<dyn Error>> {
    if let Some(path) = &opts.map {
        let text = std::fs::read_to_string(path)?;
        return Ok(TerrainMap::parse(&text)?);
    }
    if let Some(size) = &opts.random {
        let (w, h) = size
            .split_once('x')
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {size:?}"))?;
        let mut mg = MapGen::new(w.trim().parse()?, h.trim().parse()?, StdRng::from_rng(rng));
        mg.lakes(0.42, &[LakeRule::default()]);
        mg.ridges(4, 12);
        mg.structures(&[1, 2]);
        return Ok(mg.finish());
    }
    Ok(TerrainMap::parse(BUILTIN_MAP)?)
}

fn load_config(opts: &Options) -> Result<PlannerConfig, Box<dyn Error>> {
    match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(PlannerConfig::default()),
    }
}

fn run(opts: Options) -> Result<(), Box<dyn Error>> {
    let propulsion = Propulsion::from_name(&opts.propulsion)
        .ok_or_else(|| format!("unknown propulsion {:?}", opts.propulsion))?;
    let move_type = if opts.attack {
        MoveType::Attack
    } else {
        MoveType::Move
    };
    let signature = MoveSignature::new(propulsion, opts.owner, move_type);

    let mut rng = StdRng::seed_from_u64(opts.seed);
    let map = load_map(&opts, &mut rng)?;
    let config = load_config(&opts)?;
    let dest = opts
        .dest
        .unwrap_or_else(|| Point::new(map.width() - 1, map.height() / 2));

    let mut convoy = Convoy::new(map, config)?;
    let placed = convoy.spawn(opts.units, signature, &mut rng);
    log::info!("{placed} {signature} units heading for {dest}");
    convoy.order(dest)?;
    println!("{}\n", convoy.render());

    for _ in 0..opts.ticks {
        let moving = convoy.step(opts.speed)?;
        log::info!("tick {}: {moving} units moving", convoy.tick());
        if moving == 0 {
            break;
        }
    }

    println!("{}\n", convoy.render());
    let (exact, stuck) = convoy.arrivals();
    println!(
        "after {} ticks: {exact} arrived, {stuck} stuck short of {dest}, {} en route",
        convoy.tick(),
        placed - exact - stuck
    );

    let stats = convoy.planner.stats();
    println!("queries             {}", stats.queries);
    println!("blocking maps built {}", stats.blocking_maps_built);
    println!("contexts created    {}", stats.contexts_created);
    println!("contexts evicted    {}", stats.contexts_evicted);
    println!("fresh searches      {}", stats.fresh_searches);
    println!("continued searches  {}", stats.continued_searches);
    println!("fast path hits      {}", stats.fast_path_hits);
    Ok(())
}

fn main() {
    env_logger::init();
    let opts = Options::parse();
    if let Err(e) = run(opts) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
