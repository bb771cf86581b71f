//! Players: shared records, the control loop and the automated generator.

pub mod actor;
pub mod generator;
pub mod models;

pub use actor::PlayerActor;
pub use generator::Generator;
pub use models::PlayerHandle;
