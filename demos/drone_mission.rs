//! Plans a drone reconnaissance mission with both engines.
//!
//! Run with `RUST_LOG=info cargo run --example drone_mission`
//! (`RUST_LOG=drone_sweep=debug` shows every search phase).

use drone_sweep::instance::{Instance, InstanceData};
use drone_sweep::map::SignalMap;
use drone_sweep::random::create_rng;
use drone_sweep::simulation::{ConditionFactors, MonteCarlo, MonteCarloConfig};
use drone_sweep::strategy::{Heuristic, Strategy};
use drone_sweep::MissionError;
use tracing_subscriber::EnvFilter;

const MAP_SIZE: usize = 10;
const NUMBER_OF_NODES: usize = 10;

fn main() -> Result<(), MissionError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // weather, unexplored area and the two LTE reference signal measures
    // (RSRQ quality, RSRP power)
    let factors = ConditionFactors::drone_sweep();

    plan(
        1025747,
        &factors,
        |data| data.with_fleet_size(2),
        Strategy::constructive(),
    )?;
    plan(
        8634452,
        &factors,
        |data| data.with_fleet_size(4).with_annealing(1000.0, 0.95, 0.1),
        Strategy::annealing(8634452),
    )?;
    Ok(())
}

fn plan(
    seed: u64,
    factors: &ConditionFactors,
    configure: impl FnOnce(InstanceData) -> InstanceData,
    strategy: Strategy,
) -> Result<(), MissionError> {
    let mut rng = create_rng(seed);
    let map = SignalMap::generate(MAP_SIZE, NUMBER_OF_NODES, &mut rng)?;
    let data = configure(InstanceData::new("drone_sweep", 1, 42.5, map.node_list().to_vec()));
    let instance = Instance::from_data(&data)?;
    let simulator = MonteCarlo::new(
        factors.clone(),
        MonteCarloConfig::default().with_seed(seed),
    )?;

    tracing::info!(seed, engine = strategy.name(), "starting mission");
    for labeled in strategy.solve(&instance, &simulator)? {
        tracing::info!("{} solution:\n{}", labeled.label, labeled.solution);
    }
    Ok(())
}
