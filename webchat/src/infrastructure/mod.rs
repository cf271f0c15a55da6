// Infrastructure Layer - 跨模块的基础设施

mod event_bus;

pub use event_bus::*;
