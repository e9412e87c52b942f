pub mod generators;
mod stream;

pub use generators::SeaGenerator;
pub use stream::Stream;
