pub mod camera;
pub mod constants;
pub mod coordinator;
mod event_loop;
pub mod objects;
pub mod parameters;
pub mod picking;
pub mod presets;
pub mod render;
pub mod session;
pub mod sim;
pub mod transition;
pub mod ui;

pub use coordinator::{ClickOutcome, Engine, Selection, SelectionSink};
pub use event_loop::{EguiHost, InputEvent};
pub use objects::{BodyId, Objects};
pub use parameters::{BodyParams, EngineConfig, ObscurePolicy, Project};
pub use render::{BodyFrame, RenderSink};
pub use session::{Session, ViewHost};
pub use sim::{GravityLaw, ObjectInfo, PlanarDirectSim, Simulation, SimulationImpl};
pub use ui::run_app;
