pub mod bloom;
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod instances;
pub mod labels;
pub mod pulse;
pub mod quality;
pub mod scene;
pub mod session;

pub use bloom::*;
pub use camera::*;
pub use clock::*;
pub use config::*;
pub use constants::*;
pub use controls::*;
pub use error::*;
pub use instances::*;
pub use labels::*;
pub use pulse::*;
pub use quality::*;
pub use scene::*;
pub use session::*;
