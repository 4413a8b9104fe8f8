use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    Agent, Base, Field, HeadingUnits, SimulationConfig, SimulationError,
    gossip::{self, ShoutLink},
    render::{self, Renderer},
};

/// Counters describing what happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    /// Tick number after this step (the first tick reports 1).
    pub tick: u64,
    pub reflections: usize,
    pub arrivals: usize,
    pub turnarounds: usize,
    pub clamps: usize,
    pub links: usize,
}

/// Read-only view of the simulation for drawing or inspection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub tick: u64,
    pub base_a: &'a Base,
    pub base_b: &'a Base,
    pub agents: &'a [Agent],
    /// Links recorded during the most recent tick.
    pub links: &'a [ShoutLink],
}

/// Aggregate view of the population, used by hosts for status lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PopulationStats {
    pub agents: usize,
    pub heading_to_a: usize,
    pub heading_to_b: usize,
    pub mean_counter_a: f64,
    pub mean_counter_b: f64,
}

/// Owns both bases and the agent arena and advances them tick by tick.
#[derive(Debug, Clone)]
pub struct Simulation {
    base_a: Base,
    base_b: Base,
    agents: Vec<Agent>,
    field: Field,
    heading_units: HeadingUnits,
    tick: u64,
    links: Vec<ShoutLink>,
}

impl Simulation {
    /// Builds a simulation with `config.agent_count` agents rolled from `rng`.
    ///
    /// `rng` is only used here; ticking is deterministic.
    pub fn new<R: Rng + ?Sized>(
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let field = config.validate()?;
        let bases = (config.base_a.id, config.base_b.id);
        let agents = (0..config.agent_count)
            .map(|_| {
                Agent::random(rng, &field, config.min_speed..config.max_speed, bases)
                    .with_shout_range(config.shout_range)
            })
            .collect();
        Self::assemble(config, field, agents)
    }

    /// Builds a simulation from a generator seeded with `config.seed`.
    pub fn seeded(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Self::new(config, &mut rng)
    }

    /// Builds a simulation around explicitly placed agents.
    ///
    /// `config.agent_count`, speeds and seed are ignored; every agent must
    /// target one of the configured bases and have a positive shout range.
    pub fn with_agents(
        config: &SimulationConfig,
        agents: Vec<Agent>,
    ) -> Result<Self, SimulationError> {
        let field = config.validate()?;
        for (index, agent) in agents.iter().enumerate() {
            if agent.target() != config.base_a.id && agent.target() != config.base_b.id {
                return Err(SimulationError::UnknownTarget {
                    index,
                    target: agent.target(),
                });
            }
            if agent.shout_range() == 0 {
                return Err(SimulationError::InvalidConfig(
                    "shout_range must be positive",
                ));
            }
        }
        Self::assemble(config, field, agents)
    }

    fn assemble(
        config: &SimulationConfig,
        field: Field,
        agents: Vec<Agent>,
    ) -> Result<Self, SimulationError> {
        info!(
            agents = agents.len(),
            width = field.width(),
            height = field.height(),
            base_a = %config.base_a.id,
            base_b = %config.base_b.id,
            heading_units = ?config.heading_units,
            "Simulation created"
        );
        Ok(Simulation {
            base_a: config.base_a.to_base(),
            base_b: config.base_b.to_base(),
            agents,
            field,
            heading_units: config.heading_units,
            tick: 0,
            links: Vec::new(),
        })
    }

    /// Advances every agent once, in arena order.
    ///
    /// Each agent moves, ages, checks both bases and then shouts. Counter
    /// corrections made by one speaker are already visible to the agents
    /// that follow it in the same tick.
    pub fn tick(&mut self) -> TickReport {
        self.links.clear();
        let bases = (self.base_a.id(), self.base_b.id());
        let mut report = TickReport::default();

        for index in 0..self.agents.len() {
            let agent = &mut self.agents[index];
            report.reflections += usize::from(agent.advance(&self.field, self.heading_units));
            agent.age();

            let arrival = agent.arrive(&self.base_a, &self.base_b);
            report.arrivals += usize::from(arrival.at_a) + usize::from(arrival.at_b);
            report.turnarounds += usize::from(arrival.turnarounds);

            let outcome = gossip::shout(&mut self.agents, index, bases, &mut self.links);
            report.clamps += outcome.clamps;
        }

        self.tick += 1;
        report.tick = self.tick;
        report.links = self.links.len();
        debug!(
            tick = report.tick,
            reflections = report.reflections,
            arrivals = report.arrivals,
            turnarounds = report.turnarounds,
            clamps = report.clamps,
            "Tick complete"
        );
        report
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            tick: self.tick,
            base_a: &self.base_a,
            base_b: &self.base_b,
            agents: &self.agents,
            links: &self.links,
        }
    }

    /// Draws the current snapshot onto `renderer`.
    pub fn render<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        render::draw(&self.snapshot(), renderer);
    }

    pub fn stats(&self) -> PopulationStats {
        let agents = self.agents.len();
        if agents == 0 {
            return PopulationStats::default();
        }
        let heading_to_a = self
            .agents
            .iter()
            .filter(|agent| agent.target() == self.base_a.id())
            .count();
        let total_a: u64 = self.agents.iter().map(|a| u64::from(a.counter_a())).sum();
        let total_b: u64 = self.agents.iter().map(|a| u64::from(a.counter_b())).sum();
        PopulationStats {
            agents,
            heading_to_a,
            heading_to_b: agents - heading_to_a,
            mean_counter_a: total_a as f64 / agents as f64,
            mean_counter_b: total_b as f64 / agents as f64,
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }
    pub fn base_a(&self) -> &Base {
        &self.base_a
    }
    pub fn base_b(&self) -> &Base {
        &self.base_b
    }
    pub fn field(&self) -> &Field {
        &self.field
    }
    pub fn current_tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseId, Position};

    fn still(x: i32, y: i32, target: BaseId) -> Agent {
        Agent::new(Position::new(x, y), 0.0, 0.0, target)
    }

    #[test]
    fn seeded_construction_follows_the_config() {
        let config = SimulationConfig {
            agent_count: 64,
            shout_range: 12,
            ..SimulationConfig::default()
        };
        let sim = Simulation::seeded(&config).unwrap();

        assert_eq!(sim.agents().len(), 64);
        assert_eq!(sim.current_tick(), 0);
        assert!(sim.agents().iter().all(|a| a.shout_range() == 12));
        assert!(
            sim.agents()
                .iter()
                .all(|a| matches!(a.target(), BaseId::Yellow | BaseId::Blue))
        );
    }

    #[test]
    fn same_seed_same_population() {
        let config = SimulationConfig::default();
        let first = Simulation::seeded(&config).unwrap();
        let second = Simulation::seeded(&config).unwrap();
        assert_eq!(first.agents(), second.agents());
    }

    #[test]
    fn construction_rejects_invalid_config() {
        let config = SimulationConfig {
            shout_range: 0,
            ..SimulationConfig::default()
        };
        assert!(Simulation::seeded(&config).is_err());
    }

    #[test]
    fn explicit_agents_must_target_a_configured_base() {
        let config = SimulationConfig::default();
        let err = Simulation::with_agents(
            &config,
            vec![still(10, 10, BaseId::Blue), still(20, 20, BaseId::Green)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimulationError::UnknownTarget {
                index: 1,
                target: BaseId::Green
            }
        );
    }

    #[test]
    fn explicit_agents_need_a_positive_shout_range() {
        let config = SimulationConfig::default();
        let agents = vec![still(10, 10, BaseId::Blue).with_shout_range(0)];
        assert!(Simulation::with_agents(&config, agents).is_err());
    }

    #[test]
    fn empty_population_ticks() {
        let config = SimulationConfig {
            agent_count: 0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::seeded(&config).unwrap();
        let report = sim.tick();
        assert_eq!(report.tick, 1);
        assert_eq!(sim.stats(), PopulationStats::default());
    }

    #[test]
    fn links_only_describe_the_latest_tick() {
        let config = SimulationConfig::default();
        let agents = vec![
            still(250, 250, BaseId::Yellow).with_counters(0, 0),
            still(252, 250, BaseId::Blue).with_counters(80, 0),
        ];
        let mut sim = Simulation::with_agents(&config, agents).unwrap();

        let first = sim.tick();
        assert_eq!(first.links, 1);
        assert_eq!(sim.snapshot().links.len(), 1);

        let second = sim.tick();
        assert_eq!(second.links, 0);
        assert!(sim.snapshot().links.is_empty());
    }

    #[test]
    fn stats_summarize_targets_and_counters() {
        let config = SimulationConfig::default();
        let agents = vec![
            still(250, 250, BaseId::Yellow).with_counters(2, 4),
            still(300, 250, BaseId::Blue).with_counters(4, 8),
            still(350, 250, BaseId::Blue).with_counters(6, 12),
        ];
        let sim = Simulation::with_agents(&config, agents).unwrap();
        let stats = sim.stats();

        assert_eq!(stats.agents, 3);
        assert_eq!((stats.heading_to_a, stats.heading_to_b), (1, 2));
        assert_eq!(stats.mean_counter_a, 4.0);
        assert_eq!(stats.mean_counter_b, 8.0);
    }
}
