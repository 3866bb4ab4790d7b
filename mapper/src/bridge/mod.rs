pub mod model;
pub mod server;

pub use model::BridgeModel;
pub use server::MapBridge;
