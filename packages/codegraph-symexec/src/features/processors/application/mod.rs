mod registry;

pub use registry::ProcessorRegistry;
