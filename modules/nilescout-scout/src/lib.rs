pub mod classifier;
pub mod enrich;
pub mod export;
pub mod extract;
pub mod harvester;
pub mod orchestrator;
pub mod registry;
pub mod source;
pub mod sources;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
