pub mod catalog;
pub mod enrichment;
pub mod fanout;
pub mod providers;
pub mod ranker;
pub mod recommendations;
pub mod text_index;

pub use catalog::Catalog;
pub use enrichment::EnrichmentGateway;
pub use fanout::FanOutCoordinator;
pub use recommendations::Recommender;
pub use text_index::TextIndex;
