pub mod callback;
pub mod errors;
pub mod motion_reading;
pub mod table_column;
pub mod xyz;

pub use callback::*;
pub use errors::*;
pub use motion_reading::*;
pub use table_column::*;
pub use xyz::*;
