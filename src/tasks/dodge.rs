//! Lane-crossing hazard avoidance.
//!
//! Agents start on the bottom row of a small grid and try to reach the top
//! while one hazard per lane sweeps sideways. Each tick an agent sees its
//! distance to every hazard and takes the arg-max of five actions: up,
//! down, left, right or stay. Forward progress scores points; touching a
//! hazard or standing still for too long ends the episode. Every agent of a
//! generation faces the same hazard layout and the whole cohort is stepped
//! in lock-step through [`Population::evaluate_all`].

use super::{arg_max, Task};
use kittener_core::{Population, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const WIDTH: i32 = 10;
pub const LANES: usize = 6;
/// Rows: start row, one row per lane, goal row.
pub const HEIGHT: i32 = LANES as i32 + 2;
pub const MAX_TICKS: u32 = 400;
/// Ticks without progress before an agent is retired.
pub const PATIENCE: u32 = 30;

const STEP_SCORE: f64 = 10.0;
const CROSSING_BONUS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Stay,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Stay,
    ];

    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Action::Stay)
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, 1),
            Action::Down => (0, -1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Stay => (0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Hazard {
    row: i32,
    start: i32,
    direction: i32,
    /// Ticks per cell moved.
    period: u32,
}

impl Hazard {
    fn x_at(&self, tick: u32) -> i32 {
        (self.start + self.direction * (tick / self.period) as i32).rem_euclid(WIDTH)
    }
}

#[derive(Debug, Clone)]
struct Agent {
    x: i32,
    y: i32,
    best_row: i32,
    score: f64,
    still: u32,
    dead: bool,
}

impl Agent {
    fn new() -> Self {
        Self {
            x: WIDTH / 2,
            y: 0,
            best_row: 0,
            score: 0.0,
            still: 0,
            dead: false,
        }
    }

    fn step(&mut self, action: Action) {
        let (dx, dy) = action.delta();
        self.x = (self.x + dx).clamp(0, WIDTH - 1);
        self.y = (self.y + dy).clamp(0, HEIGHT - 1);

        if self.y > self.best_row {
            self.best_row = self.y;
            self.score += STEP_SCORE;
            self.still = 0;
        } else {
            self.still += 1;
        }
        if self.y == HEIGHT - 1 {
            self.score += CROSSING_BONUS;
            self.y = 0;
            self.best_row = 0;
        }
        if self.still > PATIENCE {
            self.dead = true;
        }
    }
}

/// Board state for one episode.
#[derive(Debug, Clone)]
pub struct Board {
    hazards: Vec<Hazard>,
}

impl Board {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let hazards = (0..LANES)
            .map(|lane| Hazard {
                row: lane as i32 + 1,
                start: rng.gen_range(0..WIDTH),
                direction: if rng.gen_bool(0.5) { 1 } else { -1 },
                period: rng.gen_range(1..=3),
            })
            .collect();
        Self { hazards }
    }

    fn hit(&self, agent: &Agent, tick: u32) -> bool {
        self.hazards
            .iter()
            .any(|h| h.row == agent.y && h.x_at(tick) == agent.x)
    }

    /// Distance from the agent to every hazard, scaled to [0, 1].
    fn vision(&self, agent: &Agent, tick: u32) -> Vec<f32> {
        let diagonal = f64::from(WIDTH * WIDTH + HEIGHT * HEIGHT).sqrt();
        self.hazards
            .iter()
            .map(|h| {
                let dx = f64::from(h.x_at(tick) - agent.x);
                let dy = f64::from(h.row - agent.y);
                (dx.hypot(dy) / diagonal) as f32
            })
            .collect()
    }
}

pub struct DodgeTask {
    rng: ChaCha8Rng,
}

impl DodgeTask {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Plays one episode for the whole cohort and returns each agent's score.
    pub fn run_episode(population: &mut Population, board: &Board) -> Result<Vec<f64>> {
        let mut agents = vec![Agent::new(); population.len()];

        for tick in 0..MAX_TICKS {
            if agents.iter().all(|a| a.dead) {
                break;
            }
            let inputs: Vec<Vec<f32>> = agents.iter().map(|a| board.vision(a, tick)).collect();
            let outputs = population.evaluate_all(&inputs)?;

            for (agent, output) in agents.iter_mut().zip(&outputs) {
                if agent.dead {
                    continue;
                }
                agent.step(Action::from_index(arg_max(output)));
                if board.hit(agent, tick + 1) {
                    agent.dead = true;
                }
            }
        }
        Ok(agents.into_iter().map(|a| a.score).collect())
    }
}

impl Task for DodgeTask {
    fn name(&self) -> &'static str {
        "dodge"
    }

    fn inputs(&self) -> usize {
        LANES
    }

    fn outputs(&self) -> usize {
        Action::ALL.len()
    }

    fn evaluate(&mut self, population: &mut Population) -> Result<()> {
        let board = Board::random(&mut self.rng);
        let scores = Self::run_episode(population, &board)?;
        for (i, score) in scores.into_iter().enumerate() {
            population.assign_fitness(i, score)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kittener_core::NeatConfig;

    #[test]
    fn test_agent_scores_progress_and_crossing() {
        let mut agent = Agent::new();
        for _ in 0..(HEIGHT - 1) {
            agent.step(Action::Up);
        }
        let expected = STEP_SCORE * f64::from(HEIGHT - 1) + CROSSING_BONUS;
        assert_eq!(agent.score, expected);
        assert_eq!(agent.y, 0);
    }

    #[test]
    fn test_agent_dies_when_still() {
        let mut agent = Agent::new();
        for _ in 0..=PATIENCE {
            agent.step(Action::Stay);
        }
        assert!(agent.dead);
        assert_eq!(agent.score, 0.0);
    }

    #[test]
    fn test_agent_stays_in_bounds() {
        let mut agent = Agent::new();
        for _ in 0..20 {
            agent.step(Action::Left);
            agent.step(Action::Down);
        }
        assert_eq!((agent.x, agent.y), (0, 0));
    }

    #[test]
    fn test_hazard_wraps() {
        let h = Hazard {
            row: 1,
            start: 0,
            direction: -1,
            period: 2,
        };
        assert_eq!(h.x_at(0), 0);
        assert_eq!(h.x_at(2), WIDTH - 1);
        assert_eq!(h.x_at(2 * WIDTH as u32), 0);
    }

    #[test]
    fn test_collision() {
        let board = Board {
            hazards: vec![Hazard {
                row: 1,
                start: WIDTH / 2,
                direction: 1,
                period: 3,
            }],
        };
        let mut agent = Agent::new();
        agent.step(Action::Up);
        assert!(board.hit(&agent, 1));
        assert!(!board.hit(&agent, 3));
    }

    #[test]
    fn test_episode_scores_every_genome() {
        let mut config = NeatConfig::default();
        config.population.size = 8;
        config.population.inputs = LANES;
        config.population.outputs = 5;
        config.population.seed = Some(1);
        let mut pop = Population::new(config).expect("population");

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let board = Board::random(&mut rng);
        let scores = DodgeTask::run_episode(&mut pop, &board).expect("episode");
        assert_eq!(scores.len(), 8);
        assert!(scores.iter().all(|s| *s >= 0.0));
    }
}
