//! Generation stepping over a population of networks.
//!
//! [`GeneticAlgorithm`] owns the networks and drives one generation per
//! [`next_generation`](GeneticAlgorithm::next_generation) call:
//! hall of fame → roulette mating → rescoring → repair of non-viable
//! individuals.

use super::config::GaConfig;
use super::operators::{crossover, mutate};
use super::selection::{hall_of_fame, roulette};
use super::types::{Fitness, FitnessEvaluator, Member, NetworkId};
use crate::error::{AdmissionError, GaError};
use crate::genome::Genome;
use crate::network::Network;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Evolves the weights of a population of structurally identical networks.
///
/// Every network keeps its identity across generations; only its chromosome
/// is rewritten. The population size therefore never changes unless
/// networks are explicitly added or removed.
///
/// # Usage
///
/// ```
/// use routed_evo::ga::{Fitness, GaConfig, GeneticAlgorithm};
/// use routed_evo::network::{Activation, Network};
///
/// let score = |net: &mut Network| -> Fitness {
///     match net.evaluate(&[1.0]) {
///         Ok(out) if out[0].is_finite() => (100.0 - (100.0 - out[0].floor()).abs()).max(0.0) as Fitness,
///         _ => -1,
///     }
/// };
/// let mut ga = GeneticAlgorithm::new(score, GaConfig::default().with_seed(7)).unwrap();
/// for seed in 0..10 {
///     let mut net = Network::new(1, 1, 1).with_seed(seed);
///     net.add_hidden_layer();
///     net.set_random_weights(-50, 50);
///     net.set_activations(Activation::Identity);
///     ga.add_network(net).unwrap();
/// }
/// ga.next_generation().unwrap();
/// assert_eq!(ga.generation(), 1);
/// ```
pub struct GeneticAlgorithm<E: FitnessEvaluator> {
    evaluator: E,
    config: GaConfig,
    population: Vec<Member>,
    hall: Vec<NetworkId>,
    chromosome_size: usize,
    generation: u64,
    next_id: u64,
    rng: StdRng,
}

impl<E: FitnessEvaluator> GeneticAlgorithm<E> {
    /// Creates an empty population.
    pub fn new(evaluator: E, config: GaConfig) -> Result<Self, GaError> {
        config.validate().map_err(GaError::InvalidConfig)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            evaluator,
            config,
            population: Vec::new(),
            hall: Vec::new(),
            chromosome_size: 0,
            generation: 0,
            next_id: 0,
            rng,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Admits a network into the population.
    ///
    /// The network is scored once first so the fitness function can trigger
    /// lazy weight initialization. It is then rejected if its chromosome is
    /// empty or differs in size from the rest of the population; a rejected
    /// network comes back inside the [`AdmissionError`].
    pub fn add_network(&mut self, mut network: Network) -> Result<NetworkId, AdmissionError> {
        let fitness = self.evaluator.score_fitness(&mut network);

        let size = network.chromosome_size();
        if size == 0 {
            debug!("rejecting network: chromosome not ready");
            return Err(AdmissionError {
                reason: GaError::ZeroChromosome,
                network,
            });
        }
        if !self.population.is_empty() && size != self.chromosome_size {
            debug!(
                "rejecting network: chromosome size {size}, population uses {}",
                self.chromosome_size
            );
            return Err(AdmissionError {
                reason: GaError::ChromosomeSizeMismatch {
                    expected: self.chromosome_size,
                    actual: size,
                },
                network,
            });
        }

        self.chromosome_size = size;
        let id = NetworkId(self.next_id);
        self.next_id += 1;
        self.population.push(Member {
            id,
            network,
            fitness: fitness.max(0),
        });
        Ok(id)
    }

    /// Removes a network by identity and hands it back.
    pub fn remove_network(&mut self, id: NetworkId) -> Result<Network, GaError> {
        let slot = self.slot(id).ok_or(GaError::UnknownNetwork(id))?;
        let member = self.population.remove(slot);
        self.hall.retain(|&h| h != id);
        if self.population.is_empty() {
            self.chromosome_size = 0;
        }
        Ok(member.network)
    }

    /// Advances the population by one generation.
    ///
    /// Hall-of-fame members keep their genome and fitness. Every other slot
    /// receives a child of two roulette-picked parents and is rescored; a
    /// negative score triggers repeated re-mating of that slot until a viable
    /// child is found or `max_repair_attempts` is used up.
    ///
    /// # Errors
    /// [`GaError::RepairExhausted`] if any slot could not be repaired. The
    /// generation is still completed and counted, and those slots keep their
    /// last child at fitness 0.
    pub fn next_generation(&mut self) -> Result<(), GaError> {
        if self.population.is_empty() {
            return Err(GaError::EmptyPopulation);
        }

        let parents = self
            .population
            .iter_mut()
            .map(|m| m.network.chromosome())
            .collect::<Result<Vec<_>, _>>()?;
        let fitnesses: Vec<Fitness> = self.population.iter().map(|m| m.fitness).collect();

        let elite = hall_of_fame(&fitnesses, self.config.hall_of_fame_size);
        let mut is_elite = vec![false; self.population.len()];
        for &slot in &elite {
            is_elite[slot] = true;
        }
        debug!("hall of fame holds {} of {}", elite.len(), self.population.len());

        for slot in 0..self.population.len() {
            if is_elite[slot] {
                continue;
            }
            let child = self.breed(&parents, &fitnesses)?;
            self.population[slot].network.set_chromosome(&child)?;
        }

        let scores = score_members(
            &self.evaluator,
            &mut self.population,
            &is_elite,
            self.config.parallel,
        );

        let mut failures = 0;
        for (slot, score) in scores.into_iter().enumerate() {
            let Some(score) = score else { continue };
            if score >= 0 {
                self.population[slot].fitness = score;
            } else if !self.repair(slot, &parents, &fitnesses)? {
                failures += 1;
            }
        }

        self.hall = elite.iter().map(|&slot| self.population[slot].id).collect();
        self.generation += 1;
        info!(
            "generation {}: max fitness {:?}, average {:.3}",
            self.generation,
            self.max_fitness(),
            self.average_fitness()
        );

        if failures > 0 {
            return Err(GaError::RepairExhausted {
                failures,
                attempts: self.config.max_repair_attempts.unwrap_or(0),
            });
        }
        Ok(())
    }

    /// Re-mates one slot until it scores as viable. Returns `false` when the
    /// attempt ceiling is hit.
    fn repair(
        &mut self,
        slot: usize,
        parents: &[Genome],
        fitnesses: &[Fitness],
    ) -> Result<bool, GaError> {
        let mut attempts = 0usize;
        loop {
            if self.config.max_repair_attempts.is_some_and(|max| attempts >= max) {
                warn!(
                    "network {:?} still not viable after {attempts} repair attempts",
                    self.population[slot].id
                );
                self.population[slot].fitness = 0;
                return Ok(false);
            }
            attempts += 1;

            let child = self.breed(parents, fitnesses)?;
            let member = &mut self.population[slot];
            member.network.set_chromosome(&child)?;
            let score = self.evaluator.score_fitness(&mut member.network);
            if score >= 0 {
                member.fitness = score;
                return Ok(true);
            }
        }
    }

    fn breed(&mut self, parents: &[Genome], fitnesses: &[Fitness]) -> Result<Genome, GaError> {
        let mother = roulette(fitnesses, &mut self.rng).ok_or(GaError::EmptyPopulation)?;
        let father = roulette(fitnesses, &mut self.rng).ok_or(GaError::EmptyPopulation)?;
        trace!("mating slots {mother} and {father}");
        self.mate(&parents[mother], &parents[father])
    }

    /// Produces one child genome: crossover (or a whole-parent copy) followed
    /// by per-bit mutation.
    pub fn mate(&mut self, mother: &Genome, father: &Genome) -> Result<Genome, GaError> {
        if mother.len() != father.len() {
            return Err(GaError::ChromosomeSizeMismatch {
                expected: mother.len(),
                actual: father.len(),
            });
        }
        let mut child = crossover(mother, father, self.config.crossover_rate, &mut self.rng);
        mutate(&mut child, self.config.mutation_rate, &mut self.rng);
        Ok(child)
    }

    /// Picks one network with probability proportional to its fitness.
    pub fn pick_roulette(&mut self) -> Result<NetworkId, GaError> {
        let fitnesses: Vec<Fitness> = self.population.iter().map(|m| m.fitness).collect();
        let slot = roulette(&fitnesses, &mut self.rng).ok_or(GaError::EmptyPopulation)?;
        Ok(self.population[slot].id)
    }

    /// Rescores every network, the hall of fame included, and forgets the
    /// current hall of fame.
    pub fn refresh_fitness(&mut self) {
        let keep_all = vec![false; self.population.len()];
        let scores = score_members(
            &self.evaluator,
            &mut self.population,
            &keep_all,
            self.config.parallel,
        );
        for (member, score) in self.population.iter_mut().zip(scores) {
            member.fitness = score.unwrap_or(0).max(0);
        }
        self.hall.clear();
    }

    /// The network with the highest fitness; the earliest admitted wins ties.
    pub fn fittest(&self) -> Option<&Network> {
        self.population
            .iter()
            .rev()
            .max_by_key(|m| m.fitness)
            .map(|m| &m.network)
    }

    /// Mean fitness. NaN for an empty population.
    pub fn average_fitness(&self) -> f64 {
        let total: i128 = self.population.iter().map(|m| i128::from(m.fitness)).sum();
        total as f64 / self.population.len() as f64
    }

    pub fn max_fitness(&self) -> Option<Fitness> {
        self.population.iter().map(|m| m.fitness).max()
    }

    pub fn population_size(&self) -> usize {
        self.population.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Chromosome length (in words) shared by the population; 0 when empty.
    pub fn chromosome_size(&self) -> usize {
        self.chromosome_size
    }

    /// Members carried over unchanged by the last generation.
    pub fn hall_of_fame(&self) -> &[NetworkId] {
        &self.hall
    }

    /// Ids in population order.
    pub fn ids(&self) -> impl Iterator<Item = NetworkId> + '_ {
        self.population.iter().map(|m| m.id)
    }

    pub fn network(&self, id: NetworkId) -> Option<&Network> {
        self.slot(id).map(|s| &self.population[s].network)
    }

    /// Mutable access to a member. Changes are not rescored until the next
    /// generation or [`refresh_fitness`](Self::refresh_fitness).
    pub fn network_mut(&mut self, id: NetworkId) -> Option<&mut Network> {
        self.slot(id).map(|s| &mut self.population[s].network)
    }

    pub fn fitness_of(&self, id: NetworkId) -> Option<Fitness> {
        self.slot(id).map(|s| self.population[s].fitness)
    }

    fn slot(&self, id: NetworkId) -> Option<usize> {
        self.population.iter().position(|m| m.id == id)
    }
}

/// Scores every slot not marked in `skip`, keyed by slot.
fn score_members<E: FitnessEvaluator>(
    evaluator: &E,
    members: &mut [Member],
    skip: &[bool],
    parallel: bool,
) -> Vec<Option<Fitness>> {
    let score = |(member, &skipped): (&mut Member, &bool)| {
        (!skipped).then(|| evaluator.score_fitness(&mut member.network))
    };

    #[cfg(feature = "parallel")]
    if parallel {
        return members.par_iter_mut().zip(skip.par_iter()).map(score).collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    members.iter_mut().zip(skip.iter()).map(score).collect()
}
