use lander::*;

fn main() {
    let settings = SimulationSettings::default();
    let mut sim = Simulation::new(&settings).unwrap();
    while !sim.landed() {
        sim.tick();
        println!("{:?}", sim.state);
    }
}
