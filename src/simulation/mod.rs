pub mod states;
pub mod params;
pub mod bounds;
pub mod octree;
pub mod forces;
pub mod integrator;
pub mod driver;
