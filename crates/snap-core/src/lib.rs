pub mod clock;
pub mod constants;
pub mod error;
pub mod feedback;
pub mod interaction;
pub mod particles;
pub mod persist;
pub mod pulse;
pub mod session;
pub mod sync;
pub mod timing;
pub mod visuals;
pub mod wave;

pub use clock::*;
pub use error::*;
pub use feedback::*;
pub use interaction::*;
pub use particles::*;
pub use persist::*;
pub use pulse::*;
pub use session::*;
pub use sync::*;
pub use timing::*;
pub use visuals::*;
pub use wave::*;
