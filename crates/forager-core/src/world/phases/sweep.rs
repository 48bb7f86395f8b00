use super::super::World;
use rand::seq::SliceRandom;

impl World {
    /// One pass over every agent: shuffle the collection, then move, eat and
    /// share for each agent in the new order.
    ///
    /// Sharing uses the stores as they stand at that moment, so earlier agents
    /// in the order influence what later agents see within the same sweep.
    /// The run state is not consulted; use [`World::run_frame`] for gated
    /// stepping.
    pub fn sweep(&mut self) {
        self.agents.shuffle(&mut self.rng);

        let width = self.environment.width();
        let height = self.environment.height();
        let radius = self.config.neighbourhood_radius;

        for idx in 0..self.agents.len() {
            let agent = &mut self.agents[idx];
            agent.step(&mut self.rng, width, height);
            agent.eat(&mut self.environment);
            self.share_with_neighbours(idx, radius);
        }
        self.sweep_index += 1;
    }
}
