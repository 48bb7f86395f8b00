use super::super::World;

impl World {
    /// Average stores between the agent at `idx` and every other agent within
    /// `radius`, visiting others in collection order.
    ///
    /// Each pair is updated immediately, so the agent at `idx` carries its
    /// already-averaged store into later comparisons. The agent is never
    /// paired with itself. Returns the number of pairs that shared.
    pub(in crate::world) fn share_with_neighbours(&mut self, idx: usize, radius: f64) -> usize {
        let mut shared = 0;
        for other in 0..self.agents.len() {
            if other == idx {
                continue;
            }
            if self.agents[idx].distance_to(&self.agents[other]) <= radius {
                let mean = (self.agents[idx].store + self.agents[other].store) / 2.0;
                self.agents[idx].store = mean;
                self.agents[other].store = mean;
                shared += 1;
            }
        }
        shared
    }
}
